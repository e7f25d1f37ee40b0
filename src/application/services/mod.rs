//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TableSource)
//! but are themselves concrete structs, not traits.

mod explorer;

pub use explorer::{BuiltTree, ExplorerService};
