//! Notification entity model.

use serde::Serialize;
use sqlx::FromRow;
use tasklane_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// `kind` holds one of the `tasklane_core::notification` values and
/// serializes as `type`; `is_read` serializes as `read`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: DbId,
    pub owner_id: DbId,
    pub user_id: DbId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
