//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Tasklane.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Status code outside the closed set of task statuses.
    #[error("Invalid task status code: {0}")]
    InvalidStatus(i64),

    /// Attributes were not a JSON object.
    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
