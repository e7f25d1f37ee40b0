//! Application-level errors

use thiserror::Error;

/// Application errors add context to failures of the table source and lookups.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
