//! Service errors.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::validation::FieldErrors;

/// Errors returned by services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input was rejected.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Data access failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Returns true when the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}
