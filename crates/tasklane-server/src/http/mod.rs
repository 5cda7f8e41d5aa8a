//! HTTP server.
//!
//! Provides endpoints for:
//! - Task resource (`/tasks`, `/tasks/:id`)
//! - Health check (`/health`)
//!
//! Every response except the health check is an [`envelope::Envelope`].

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod envelope;
pub mod error;
mod handlers;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Task resource
        .route(
            "/tasks",
            get(handlers::index)
                .post(handlers::store)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/tasks/:id",
            get(handlers::show)
                .put(handlers::update)
                .patch(handlers::update)
                .delete(handlers::destroy)
                .fallback(handlers::method_not_allowed),
        )
        // Observability routes
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
