//! Repository errors.

use tasklane_core::{CoreError, Id};
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row with the given id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Id },

    /// Storage backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Row could not be translated to or from the entity type.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Attributes could not be applied.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RepositoryError {
    /// Returns true for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
