//! Handlers for the `/history` resource (task audit trail).
//!
//! Most rows are written by the event-driven recorder; `POST /history`
//! exists for manual entries (e.g. imports or corrections).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tasklane_core::error::CoreError;
use tasklane_core::history::HistoryAction;
use tasklane_core::types::DbId;
use tasklane_db::models::history::HistoryEntry;
use tasklane_db::repositories::{HistoryRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 500;

/// Default page size when listing across all tasks.
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for `GET /history`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListQuery {
    pub task_id: Option<DbId>,
    pub limit: Option<i64>,
}

/// Request body for `POST /history`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryRequest {
    pub task_id: Option<DbId>,
    pub action: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// GET /history?taskId=&limit=
///
/// List audit entries for the caller's tasks, newest first. With `taskId`
/// the full trail of that task is returned by default; without it the
/// listing covers all tasks and defaults to a smaller page.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<HistoryListQuery>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    if let Some(task_id) = params.task_id {
        TaskRepo::find_by_id(state.db()?, user.user_id, task_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            }))?;
    }

    let default_limit = if params.task_id.is_some() {
        MAX_LIMIT
    } else {
        DEFAULT_LIMIT
    };
    let limit = params.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);

    let entries = HistoryRepo::list(state.db()?, user.user_id, params.task_id, limit).await?;
    Ok(Json(entries))
}

/// POST /history
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateHistoryRequest>,
) -> AppResult<(StatusCode, Json<HistoryEntry>)> {
    let action = input.action.as_deref().unwrap_or("").trim().to_string();
    let Some(task_id) = input.task_id else {
        return Err(AppError::Core(CoreError::Validation(
            "Task and action are required".into(),
        )));
    };
    if action.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Task and action are required".into(),
        )));
    }

    let action = HistoryAction::from_str(&action)?;

    TaskRepo::find_by_id(state.db()?, user.user_id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    let entry = HistoryRepo::create(
        state.db()?,
        user.user_id,
        task_id,
        user.user_id,
        action.as_str(),
        input.old_value.as_deref().unwrap_or(""),
        input.new_value.as_deref().unwrap_or(""),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
