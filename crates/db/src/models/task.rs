//! Task entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tasklane_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
///
/// `status` and `priority` are stored as validated strings; see
/// `tasklane_core::task` for the accepted values.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task. All fields are already validated and
/// defaulted by the handler.
#[derive(Debug)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
}

/// DTO for partially updating a task.
///
/// `assigned_to` and `due_date` use `Option<Option<T>>` so a present
/// inner `None` clears the column while an absent outer `None` keeps
/// the current value.
#[derive(Debug, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    pub assigned_to: Option<Option<DbId>>,
    pub due_date: Option<Option<Timestamp>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
}

/// Optional filters for task listing.
#[derive(Debug, Default)]
pub struct TaskFilter {
    pub project_id: Option<DbId>,
    /// Outer `None` = no filter; inner `None` = unassigned tasks only.
    pub assigned_to: Option<Option<DbId>>,
}
