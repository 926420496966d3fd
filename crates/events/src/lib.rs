//! Task event bus and its background consumers.
//!
//! Mutating task endpoints publish a [`TaskEvent`] after the database
//! write commits; the API response never waits on the consumers:
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`HistoryRecorder`] -- writes the task audit trail.
//! - [`Notifier`] -- fans out assignee and admin notifications.

pub mod bus;
pub mod notifier;
pub mod recorder;

pub use bus::{Actor, EventBus, TaskChange, TaskEvent};
pub use notifier::Notifier;
pub use recorder::HistoryRecorder;
