//! Task handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use tasklane_core::Id;

use crate::http::envelope::{Envelope, Payload};
use crate::http::error::ApiError;
use crate::state::AppState;
use crate::validation::TaskRequest;

/// Base path of the task resource, used in page URLs.
const TASKS_PATH: &str = "/tasks";

/// Handler result: both arms render as envelopes.
type EnvelopeResult = Result<Envelope, Envelope>;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// 1-based page number; absent means "everything".
    pub page: Option<u64>,

    /// Skip the total count.
    #[serde(default)]
    pub simple: bool,
}

fn task_id(state: &AppState, id: Result<Path<i64>, PathRejection>) -> Result<Id, Envelope> {
    let Path(id) = id.map_err(|e| state.fail(e))?;
    Ok(Id::new(id))
}

/// List tasks, optionally one page at a time.
pub async fn index(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> EnvelopeResult {
    let Query(params) = params.map_err(|e| state.fail(e))?;

    let payload = match params.page {
        Some(page) => {
            let page = state
                .tasks
                .paginate_tasks(page, params.simple)
                .await
                .map_err(|e| state.fail(e))?;
            Payload::page(page.with_path(TASKS_PATH)).map_err(|e| state.fail(e))?
        }
        None => {
            let tasks = state.tasks.get_all_tasks().await.map_err(|e| state.fail(e))?;
            Payload::collection(&tasks).map_err(|e| state.fail(e))?
        }
    };

    Ok(Envelope::success(payload, ""))
}

/// Create a task.
pub async fn store(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> EnvelopeResult {
    let Json(body) = body.map_err(|e| state.fail(e))?;
    let attributes =
        TaskRequest::store(&body).map_err(|errors| state.fail(ApiError::Validation(errors)))?;

    let task = state
        .tasks
        .create_task(attributes)
        .await
        .map_err(|e| state.fail(e))?;
    info!(task_id = %task.id, "Created task via HTTP");

    Ok(Envelope::message("Task created")
        .with_code(StatusCode::CREATED)
        .with_success(true))
}

/// Show one task.
pub async fn show(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> EnvelopeResult {
    let id = task_id(&state, id)?;

    let task = state
        .tasks
        .get_task_by_id(id)
        .await
        .map_err(|e| state.fail(e))?
        .ok_or_else(|| state.fail(ApiError::NotFound))?;

    let payload = Payload::item(&task).map_err(|e| state.fail(e))?;
    Ok(Envelope::success(payload, ""))
}

/// Update a task (PUT or PATCH).
pub async fn update(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> EnvelopeResult {
    let id = task_id(&state, id)?;
    let Json(body) = body.map_err(|e| state.fail(e))?;
    let attributes =
        TaskRequest::update(&body).map_err(|errors| state.fail(ApiError::Validation(errors)))?;

    let updated = state
        .tasks
        .update_task(id, attributes)
        .await
        .map_err(|e| state.fail(e))?;
    if updated == 0 {
        return Err(state.fail(ApiError::NotFound));
    }

    Ok(Envelope::message("Task updated")
        .with_code(StatusCode::OK)
        .with_success(true))
}

/// Delete a task.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> EnvelopeResult {
    let id = task_id(&state, id)?;

    state.tasks.delete_task(id).await.map_err(|e| state.fail(e))?;

    Ok(Envelope::message("Task deleted")
        .with_code(StatusCode::OK)
        .with_success(true))
}
