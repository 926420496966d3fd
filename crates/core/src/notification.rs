//! Notification kind vocabulary.

use crate::error::CoreError;

/// Why a notification was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    TaskAssigned,
    TaskUpdated,
    TaskCompleted,
    CommentAdded,
    AdminAlert,
}

/// All valid notification kind strings.
pub const VALID_KINDS: &[&str] = &[
    "task_assigned",
    "task_updated",
    "task_completed",
    "comment_added",
    "admin_alert",
];

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskUpdated => "task_updated",
            Self::TaskCompleted => "task_completed",
            Self::CommentAdded => "comment_added",
            Self::AdminAlert => "admin_alert",
        }
    }

    /// Parse a kind from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "task_assigned" => Ok(Self::TaskAssigned),
            "task_updated" => Ok(Self::TaskUpdated),
            "task_completed" => Ok(Self::TaskCompleted),
            "comment_added" => Ok(Self::CommentAdded),
            "admin_alert" => Ok(Self::AdminAlert),
            _ => Err(CoreError::Validation(format!(
                "Invalid notification type '{s}'. Must be one of: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
