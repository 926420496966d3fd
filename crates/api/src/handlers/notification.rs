//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and read only the
//! caller's rows. Most rows are written by the event-driven notifier;
//! `POST /notifications` exists for manual entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tasklane_core::error::CoreError;
use tasklane_core::notification::NotificationKind;
use tasklane_core::types::DbId;
use tasklane_db::models::notification::Notification;
use tasklane_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    /// Restrict to notifications addressed to this user id.
    pub user_id: Option<DbId>,
    /// `1` or `true` returns only unread notifications.
    pub unread: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
}

/// Request body for `POST /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: Option<DbId>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Request body for `PATCH /notifications/{id}`.
#[derive(Debug, Deserialize)]
pub struct SetReadRequest {
    /// Defaults to `true` when absent, matching the endpoint's main use.
    pub read: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /notifications?userId=&unread=&limit=
///
/// List the caller's notifications, newest first, with optional filters.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<NotificationListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let unread_only = matches!(params.unread.as_deref(), Some("1") | Some("true"));
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let notifications = NotificationRepo::list(
        state.db()?,
        user.user_id,
        params.user_id,
        unread_only,
        limit,
    )
    .await?;

    Ok(Json(notifications))
}

/// GET /notifications/unread
///
/// Return the number of unread notifications addressed to the caller.
pub async fn unread_count(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(state.db()?, user.user_id).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

/// POST /notifications
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    let message = input.message.as_deref().unwrap_or("").trim().to_string();
    let kind = input.kind.as_deref().unwrap_or("").trim().to_string();
    let Some(recipient_id) = input.user_id else {
        return Err(AppError::Core(CoreError::Validation(
            "User, message and type are required".into(),
        )));
    };
    if message.is_empty() || kind.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "User, message and type are required".into(),
        )));
    }

    let kind = NotificationKind::from_str(&kind)?;

    let notification = NotificationRepo::create(
        state.db()?,
        user.user_id,
        recipient_id,
        &message,
        kind.as_str(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// PUT /notifications/mark-read
///
/// Mark all of the caller's unread notifications as read. Idempotent; a
/// second call reports zero.
pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(state.db()?, user.user_id).await?;
    Ok(Json(serde_json::json!({ "markedRead": count })))
}

/// PATCH /notifications/{id}
///
/// Set the read flag on a single notification. 404 if the notification
/// does not belong to the caller.
pub async fn set_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetReadRequest>,
) -> AppResult<Json<Notification>> {
    let read = input.read.unwrap_or(true);

    let notification = NotificationRepo::set_read(state.db()?, user.user_id, id, read)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;

    Ok(Json(notification))
}
