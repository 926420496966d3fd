//! Handlers for the `/tasks` resource.
//!
//! Mutations publish a [`TaskEvent`] on the bus after the row is committed;
//! the history recorder and notifier consume it off the request path, so a
//! slow or failing consumer never delays the HTTP response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use tasklane_core::error::CoreError;
use tasklane_core::task::{TaskPriority, TaskStatus};
use tasklane_core::types::{DbId, Timestamp};
use tasklane_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use tasklane_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use tasklane_events::{Actor, TaskChange, TaskEvent};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub project_id: Option<DbId>,
    /// `0` selects unassigned tasks.
    pub assigned_to: Option<DbId>,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    /// `0` or absent means unassigned.
    pub assigned_to: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
}

/// Request body for `PUT /tasks/{id}`. Absent fields keep current values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    /// `0` clears the assignment.
    pub assigned_to: Option<DbId>,
    /// Explicit `null` clears the due date.
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<Timestamp>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
}

/// Keep an explicit JSON `null` distinguishable from an absent field.
///
/// A plain `Option<Option<T>>` folds `null` into the outer `None`; routing
/// through this function yields `Some(None)` instead, so `{"dueDate": null}`
/// clears the stored value rather than leaving it untouched.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /tasks
///
/// List the caller's tasks, newest first, with optional project and
/// assignee filters.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TaskListQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let filter = TaskFilter {
        project_id: params.project_id,
        assigned_to: params
            .assigned_to
            .map(|v| if v == 0 { None } else { Some(v) }),
    };

    let tasks = TaskRepo::list(state.db()?, user.user_id, &filter).await?;
    Ok(Json(tasks))
}

/// POST /tasks
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let title = input.title.as_deref().unwrap_or("").trim().to_string();
    let Some(project_id) = input.project_id else {
        return Err(AppError::Core(CoreError::Validation(
            "Title and project are required".into(),
        )));
    };
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title and project are required".into(),
        )));
    }

    let status = match input.status.as_deref() {
        Some(s) => TaskStatus::from_str(s)?,
        None => TaskStatus::default(),
    };
    let priority = match input.priority.as_deref() {
        Some(p) => TaskPriority::from_str(p)?,
        None => TaskPriority::default(),
    };

    require_owned_project(&state, user.user_id, project_id).await?;

    let create_dto = CreateTask {
        title,
        description: input.description.unwrap_or_default(),
        status: status.as_str().to_string(),
        priority: priority.as_str().to_string(),
        project_id,
        assigned_to: input.assigned_to.filter(|&v| v != 0),
        created_by: user.user_id,
        due_date: input.due_date,
        estimated_hours: input.estimated_hours.unwrap_or(0.0),
        actual_hours: input.actual_hours.unwrap_or(0.0),
    };

    let actor = load_actor(&state, &user).await?;
    let task = TaskRepo::create(state.db()?, user.user_id, &create_dto).await?;

    state.event_bus.publish(TaskEvent::new(
        task.id,
        task.owner_id,
        actor,
        TaskChange::Created {
            title: task.title.clone(),
            assigned_to: task.assigned_to,
        },
    ));

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let task = TaskRepo::find_by_id(state.db()?, user.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// PUT /tasks/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let existing = TaskRepo::find_by_id(state.db()?, user.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let status = input
        .status
        .as_deref()
        .map(TaskStatus::from_str)
        .transpose()?;
    let priority = input
        .priority
        .as_deref()
        .map(TaskPriority::from_str)
        .transpose()?;

    if let Some(project_id) = input.project_id {
        require_owned_project(&state, user.user_id, project_id).await?;
    }

    let update_dto = UpdateTask {
        title: input.title,
        description: input.description,
        status: status.map(|s| s.as_str().to_string()),
        priority: priority.map(|p| p.as_str().to_string()),
        project_id: input.project_id,
        assigned_to: input
            .assigned_to
            .map(|v| if v == 0 { None } else { Some(v) }),
        due_date: input.due_date,
        estimated_hours: input.estimated_hours,
        actual_hours: input.actual_hours,
    };

    let actor = load_actor(&state, &user).await?;
    let task = TaskRepo::update(state.db()?, user.user_id, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    state.event_bus.publish(TaskEvent::new(
        task.id,
        task.owner_id,
        actor,
        TaskChange::Updated {
            old_title: existing.title,
            new_title: task.title.clone(),
            old_status: existing.status,
            new_status: task.status.clone(),
            assigned_to: task.assigned_to,
        },
    ));

    Ok(Json(task))
}

/// DELETE /tasks/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let existing = TaskRepo::find_by_id(state.db()?, user.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let actor = load_actor(&state, &user).await?;
    let deleted = TaskRepo::delete(state.db()?, user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }));
    }

    state.event_bus.publish(TaskEvent::new(
        existing.id,
        existing.owner_id,
        actor,
        TaskChange::Deleted {
            title: existing.title,
        },
    ));

    Ok(Json(serde_json::json!({ "message": "Task deleted" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the project exists and belongs to `owner_id`.
async fn require_owned_project(
    state: &AppState,
    owner_id: DbId,
    project_id: DbId,
) -> AppResult<()> {
    ProjectRepo::find_by_id(state.db()?, owner_id, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}

/// Build the event [`Actor`] for the caller, with the role loaded fresh
/// from the database.
pub(crate) async fn load_actor(state: &AppState, user: &AuthUser) -> AppResult<Actor> {
    let record = UserRepo::find_by_id(state.db()?, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

    Ok(Actor {
        id: record.id,
        username: record.username,
        role: record.role,
    })
}
