//! Error conversion helpers for I/O at the table source boundary

use std::fmt::Display;
use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add context naming the action and its target.
    ///
    /// # Example
    /// ```ignore
    /// source.fetch_rows()
    ///     .with_context("load table", source.describe())?;
    /// ```
    fn with_context(self, action: &str, target: impl Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: &str, target: impl Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, target),
            source: Box::new(e),
        })
    }
}
