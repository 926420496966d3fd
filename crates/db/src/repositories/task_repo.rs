//! Repository for the `tasks` table.

use sqlx::PgPool;
use tasklane_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, owner_id, title, description, status, priority, project_id, \
    assigned_to, created_by, due_date, estimated_hours, actual_hours, \
    created_at, updated_at";

/// Provides owner-scoped CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task for the owner, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (owner_id, title, description, status, priority, \
                                project_id, assigned_to, created_by, due_date, \
                                estimated_hours, actual_hours) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.project_id)
            .bind(input.assigned_to)
            .bind(input.created_by)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .fetch_one(pool)
            .await
    }

    /// Find one of the owner's tasks by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE owner_id = $1 AND id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's tasks, most recently created first.
    ///
    /// `filter.assigned_to` with an inner `None` matches unassigned
    /// tasks; `IS NOT DISTINCT FROM` makes the NULL comparison work.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let assigned_filtered = filter.assigned_to.is_some();
        let assigned_value = filter.assigned_to.flatten();

        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE owner_id = $1 \
               AND ($2::BIGINT IS NULL OR project_id = $2) \
               AND (NOT $3 OR assigned_to IS NOT DISTINCT FROM $4::BIGINT) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(filter.project_id)
            .bind(assigned_filtered)
            .bind(assigned_value)
            .fetch_all(pool)
            .await
    }

    /// Update one of the owner's tasks. Only provided fields are applied.
    ///
    /// Returns `None` if the owner has no task with the given ID.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        // For assigned_to / due_date: if the outer Option is Some, use
        // the inner value (which may be None to clear). If the outer
        // Option is None, keep the existing column value.
        let assigned_provided = input.assigned_to.is_some();
        let assigned_value = input.assigned_to.flatten();
        let due_provided = input.due_date.is_some();
        let due_value = input.due_date.flatten();

        let query = format!(
            "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 status = COALESCE($5, status), \
                 priority = COALESCE($6, priority), \
                 project_id = COALESCE($7, project_id), \
                 assigned_to = CASE WHEN $8 THEN $9::BIGINT ELSE assigned_to END, \
                 due_date = CASE WHEN $10 THEN $11::TIMESTAMPTZ ELSE due_date END, \
                 estimated_hours = COALESCE($12, estimated_hours), \
                 actual_hours = COALESCE($13, actual_hours), \
                 updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.project_id)
            .bind(assigned_provided)
            .bind(assigned_value)
            .bind(due_provided)
            .bind(due_value)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .fetch_optional(pool)
            .await
    }

    /// Delete one of the owner's tasks. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
