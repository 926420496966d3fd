//! Shared domain types for the tasklane workspace.
//!
//! Holds the primitives every other crate builds on: id/timestamp
//! aliases, role constants, the task/history/notification vocabularies,
//! and the [`CoreError`](error::CoreError) taxonomy that the API layer
//! maps onto HTTP statuses.

pub mod error;
pub mod history;
pub mod notification;
pub mod roles;
pub mod task;
pub mod types;

pub use error::CoreError;
pub use types::{DbId, Timestamp};
