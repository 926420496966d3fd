//! Task history (audit trail) entity model.

use serde::Serialize;
use sqlx::FromRow;
use tasklane_core::types::{DbId, Timestamp};

/// A row from the `task_history` table.
///
/// `created_at` is when the recorded action happened; it serializes as
/// `timestamp` on the wire.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: DbId,
    pub owner_id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub old_value: String,
    pub new_value: String,
    #[serde(rename = "timestamp")]
    pub created_at: Timestamp,
}
