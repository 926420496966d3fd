//! Comment entity model.

use serde::Serialize;
use sqlx::FromRow;
use tasklane_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    pub owner_id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub comment_text: String,
    pub created_at: Timestamp,
}
