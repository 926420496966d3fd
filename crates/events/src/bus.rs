//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`TaskEvent`]s.
//! It is designed to be shared cheaply (cloned) across the application.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tasklane_core::types::{DbId, Timestamp};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TaskEvent
// ---------------------------------------------------------------------------

/// The user whose request produced an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: DbId,
    pub username: String,
    pub role: String,
}

/// What happened to the task.
///
/// Status and title values are carried as the validated strings stored
/// in the database so consumers can diff and render them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskChange {
    Created {
        title: String,
        assigned_to: Option<DbId>,
    },
    Updated {
        old_title: String,
        new_title: String,
        old_status: String,
        new_status: String,
        assigned_to: Option<DbId>,
    },
    Deleted {
        title: String,
    },
}

/// A domain event describing a task mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// The task the change applies to.
    pub task_id: DbId,

    /// Tenant that owns the task.
    pub owner_id: DbId,

    /// The user that performed the change.
    pub actor: Actor,

    /// The change itself.
    pub change: TaskChange,

    /// When the change happened (UTC).
    pub occurred_at: Timestamp,
}

impl TaskEvent {
    /// Create a new event stamped with the current time.
    pub fn new(task_id: DbId, owner_id: DbId, actor: Actor, change: TaskChange) -> Self {
        Self {
            task_id,
            owner_id,
            actor,
            change,
            occurred_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`TaskEvent`].
///
/// # Usage
///
/// ```rust
/// use tasklane_events::bus::{Actor, EventBus, TaskChange, TaskEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// let actor = Actor { id: 1, username: "admin".into(), role: "admin".into() };
/// bus.publish(TaskEvent::new(
///     42,
///     1,
///     actor,
///     TaskChange::Created { title: "T1".into(), assigned_to: None },
/// ));
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TaskEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// Publishing never blocks the caller.
    pub fn publish(&self, event: TaskEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            id: 7,
            username: "alice".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(TaskEvent::new(
            42,
            7,
            actor(),
            TaskChange::Created {
                title: "Write report".to_string(),
                assigned_to: Some(9),
            },
        ));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.task_id, 42);
        assert_eq!(received.owner_id, 7);
        assert_eq!(received.actor.username, "alice");
        match received.change {
            TaskChange::Created { title, assigned_to } => {
                assert_eq!(title, "Write report");
                assert_eq!(assigned_to, Some(9));
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(TaskEvent::new(
            1,
            1,
            actor(),
            TaskChange::Deleted {
                title: "Old task".to_string(),
            },
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.task_id, 1);
        assert_eq!(e2.task_id, 1);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers -- this must not panic.
        bus.publish(TaskEvent::new(
            1,
            1,
            actor(),
            TaskChange::Created {
                title: "Orphan".to_string(),
                assigned_to: None,
            },
        ));
    }
}
