//! Repository for the `notifications` table.
//!
//! `owner_id` is the tenant whose listing shows the row; `user_id` is
//! the recipient. Rows written by the event consumers set both to the
//! recipient so cross-user notifications land in the right tenant.

use sqlx::PgPool;
use tasklane_core::types::DbId;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, owner_id, user_id, message, kind, is_read, created_at, updated_at";

/// Provides owner-scoped operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the created row. Starts unread.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        user_id: DbId,
        message: &str,
        kind: &str,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (owner_id, user_id, message, kind) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(owner_id)
            .bind(user_id)
            .bind(message)
            .bind(kind)
            .fetch_one(pool)
            .await
    }

    /// List the owner's notifications, newest first.
    ///
    /// When `user_id` is given only that recipient's rows are returned;
    /// when `unread_only` is `true`, only rows with `is_read = false`.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        user_id: Option<DbId>,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE owner_id = $1 \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
               {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(owner_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update the read flag on one of the owner's notifications.
    ///
    /// Returns `None` if the owner has no notification with the given ID.
    pub async fn set_read(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        read: bool,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(owner_id)
            .bind(id)
            .bind(read)
            .fetch_optional(pool)
            .await
    }

    /// Mark all of a user's unread notifications as read.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, updated_at = NOW() \
             WHERE owner_id = $1 AND user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications addressed to a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE owner_id = $1 AND user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
