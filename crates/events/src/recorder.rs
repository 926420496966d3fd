//! Task audit trail recorder.
//!
//! [`HistoryRecorder`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes a `task_history` row for every task
//! mutation it observes. It runs as a long-lived background task and
//! shuts down gracefully when the bus sender is dropped.

use tasklane_core::history::HistoryAction;
use tasklane_db::repositories::HistoryRepo;
use tasklane_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{TaskChange, TaskEvent};

/// Background service that persists task history entries.
pub struct HistoryRecorder;

impl HistoryRecorder {
    /// Run the recording loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and records
    /// every event it receives. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<TaskEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::record(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            task_id = event.task_id,
                            "Failed to record task history"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "History recorder lagged, some entries were not written"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, history recorder shutting down");
                    break;
                }
            }
        }
    }

    /// Write the audit rows for a single event.
    ///
    /// An update produces one row per changed attribute (status, title);
    /// an update that changed neither writes nothing.
    async fn record(pool: &DbPool, event: &TaskEvent) -> Result<(), sqlx::Error> {
        match &event.change {
            TaskChange::Created { title, .. } => {
                HistoryRepo::create(
                    pool,
                    event.owner_id,
                    event.task_id,
                    event.actor.id,
                    HistoryAction::Created.as_str(),
                    "",
                    title,
                )
                .await?;
            }
            TaskChange::Updated {
                old_title,
                new_title,
                old_status,
                new_status,
                ..
            } => {
                if old_status != new_status {
                    HistoryRepo::create(
                        pool,
                        event.owner_id,
                        event.task_id,
                        event.actor.id,
                        HistoryAction::StatusChanged.as_str(),
                        old_status,
                        new_status,
                    )
                    .await?;
                }
                if old_title != new_title {
                    HistoryRepo::create(
                        pool,
                        event.owner_id,
                        event.task_id,
                        event.actor.id,
                        HistoryAction::TitleChanged.as_str(),
                        old_title,
                        new_title,
                    )
                    .await?;
                }
            }
            TaskChange::Deleted { title } => {
                HistoryRepo::create(
                    pool,
                    event.owner_id,
                    event.task_id,
                    event.actor.id,
                    HistoryAction::Deleted.as_str(),
                    title,
                    "",
                )
                .await?;
            }
        }
        Ok(())
    }
}
