//! Repository for the `comments` table.

use sqlx::PgPool;
use tasklane_core::types::DbId;

use crate::models::comment::Comment;

/// Column list for `comments` queries.
const COLUMNS: &str = "id, owner_id, task_id, user_id, comment_text, created_at";

/// Provides owner-scoped operations for task comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment on a task, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        task_id: DbId,
        user_id: DbId,
        comment_text: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (owner_id, task_id, user_id, comment_text) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(owner_id)
            .bind(task_id)
            .bind(user_id)
            .bind(comment_text)
            .fetch_one(pool)
            .await
    }

    /// List all comments on one of the owner's tasks, oldest first.
    pub async fn list_for_task(
        pool: &PgPool,
        owner_id: DbId,
        task_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE owner_id = $1 AND task_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(owner_id)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
