//! Application layer: services and session state
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::{reduce, Action, ExplorerSession, ExplorerState, FetchStatus, RefreshOutcome};
