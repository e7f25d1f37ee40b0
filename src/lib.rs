//! captree: capability spend explorer
//!
//! Builds a capability hierarchy (three levels of capability branches with
//! applications as leaves) from a flat spend table, and answers lookups,
//! value ranges and filtered leaf listings over it.
//!
//! Layers, from the inside out:
//! - [`domain`]: tree model and the pure operations over it
//! - [`application`]: explorer service and session state
//! - [`infrastructure`]: table sources and service wiring
//! - [`cli`]: argument parsing and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
