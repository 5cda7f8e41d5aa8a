//! Health and fallback handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::state::AppState;

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Unknown routes.
pub async fn not_found(State(state): State<Arc<AppState>>) -> Envelope {
    state.fail(ApiError::NotFound)
}

/// Known route, unsupported method.
pub async fn method_not_allowed() -> Envelope {
    Envelope::message("Method not allowed").with_code(StatusCode::METHOD_NOT_ALLOWED)
}
