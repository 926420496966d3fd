//! Repository for the `task_history` audit table.

use sqlx::PgPool;
use tasklane_core::types::DbId;

use crate::models::history::HistoryEntry;

/// Column list for `task_history` queries.
const COLUMNS: &str = "id, owner_id, task_id, user_id, action, old_value, new_value, created_at";

/// Provides owner-scoped operations for the task audit trail.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert an audit entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        task_id: DbId,
        user_id: DbId,
        action: &str,
        old_value: &str,
        new_value: &str,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_history (owner_id, task_id, user_id, action, old_value, new_value) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(owner_id)
            .bind(task_id)
            .bind(user_id)
            .bind(action)
            .bind(old_value)
            .bind(new_value)
            .fetch_one(pool)
            .await
    }

    /// List the owner's audit entries, newest first, optionally
    /// restricted to a single task.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        task_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_history \
             WHERE owner_id = $1 \
               AND ($2::BIGINT IS NULL OR task_id = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(owner_id)
            .bind(task_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
