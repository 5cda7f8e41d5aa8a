//! HTTP-level errors and their envelopes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

use crate::http::envelope::Envelope;
use crate::i18n::Translator;
use crate::service::ServiceError;
use crate::validation::FieldErrors;

/// Failures a handler can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested resource does not exist.
    #[error("Not found")]
    NotFound,

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Request could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Anything unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Render the error as an envelope.
    pub fn to_envelope(&self, translator: &Translator) -> Envelope {
        match self {
            Self::NotFound => Envelope::message(translator.get("messages.not_found"))
                .with_code(StatusCode::NOT_FOUND),
            Self::Validation(errors) => Envelope::validation_failure(errors),
            Self::BadRequest(reason) => {
                warn!(reason = %reason, "Rejected malformed request");
                Envelope::message(translator.get("messages.bad_request"))
                    .with_code(StatusCode::BAD_REQUEST)
            }
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed");
                Envelope::server_error(translator)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            return Self::NotFound;
        }
        match err {
            ServiceError::Validation(errors) => Self::Validation(errors),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}
