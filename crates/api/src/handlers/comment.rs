//! Handlers for the `/comments` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tasklane_core::error::CoreError;
use tasklane_core::types::DbId;
use tasklane_db::models::comment::Comment;
use tasklane_db::repositories::{CommentRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /comments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub task_id: Option<DbId>,
}

/// Request body for `POST /comments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub task_id: Option<DbId>,
    pub comment_text: Option<String>,
}

/// GET /comments?taskId=
///
/// List the comments on one of the caller's tasks, oldest first.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CommentListQuery>,
) -> AppResult<Json<Vec<Comment>>> {
    let task_id = params.task_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Task is required".into()))
    })?;

    TaskRepo::find_by_id(state.db()?, user.user_id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    let comments = CommentRepo::list_for_task(state.db()?, user.user_id, task_id).await?;
    Ok(Json(comments))
}

/// POST /comments
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment_text = input.comment_text.as_deref().unwrap_or("").trim().to_string();
    let Some(task_id) = input.task_id else {
        return Err(AppError::Core(CoreError::Validation(
            "Task and comment text are required".into(),
        )));
    };
    if comment_text.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Task and comment text are required".into(),
        )));
    }

    TaskRepo::find_by_id(state.db()?, user.user_id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    let comment =
        CommentRepo::create(state.db()?, user.user_id, task_id, user.user_id, &comment_text)
            .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
