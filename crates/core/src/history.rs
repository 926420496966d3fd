//! Task audit trail action vocabulary.

use crate::error::CoreError;

/// What a history row records about a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Created,
    StatusChanged,
    TitleChanged,
    Deleted,
    Updated,
}

/// All valid history action strings.
pub const VALID_ACTIONS: &[&str] = &[
    "CREATED",
    "STATUS_CHANGED",
    "TITLE_CHANGED",
    "DELETED",
    "UPDATED",
];

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::StatusChanged => "STATUS_CHANGED",
            Self::TitleChanged => "TITLE_CHANGED",
            Self::Deleted => "DELETED",
            Self::Updated => "UPDATED",
        }
    }

    /// Parse an action from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "CREATED" => Ok(Self::Created),
            "STATUS_CHANGED" => Ok(Self::StatusChanged),
            "TITLE_CHANGED" => Ok(Self::TitleChanged),
            "DELETED" => Ok(Self::Deleted),
            "UPDATED" => Ok(Self::Updated),
            _ => Err(CoreError::Validation(format!(
                "Invalid history action '{s}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
