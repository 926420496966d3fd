//! Notification fan-out service.
//!
//! [`Notifier`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! turns task events into in-app notification rows:
//!
//! - the assignee hears about tasks assigned to, updated under, or
//!   completed for them;
//! - every admin gets an `admin_alert` describing what a non-admin user
//!   did. Admin actors do not alert other admins.
//!
//! Rows are written with `owner_id` = recipient so they show up in the
//! recipient's tenant-scoped listing.

use tasklane_core::notification::NotificationKind;
use tasklane_core::roles::ROLE_ADMIN;
use tasklane_core::task::TaskStatus;
use tasklane_core::types::DbId;
use tasklane_db::repositories::{NotificationRepo, UserRepo};
use tasklane_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::{Actor, TaskChange, TaskEvent};

/// Background service that writes notifications for task events.
pub struct Notifier;

impl Notifier {
    /// Run the notification loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<TaskEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::notify(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            task_id = event.task_id,
                            "Failed to write notifications"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notifier lagged, some notifications were not sent"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Write the notification rows for a single event.
    async fn notify(pool: &DbPool, event: &TaskEvent) -> Result<(), sqlx::Error> {
        match &event.change {
            TaskChange::Created { title, assigned_to } => {
                if let Some(assignee) = assigned_to {
                    Self::send(
                        pool,
                        *assignee,
                        &format!("New task assigned: {title}"),
                        NotificationKind::TaskAssigned,
                    )
                    .await?;
                }
                Self::alert_admins(
                    pool,
                    &event.actor,
                    &format!("User {} created task \"{title}\"", event.actor.username),
                )
                .await?;
            }
            TaskChange::Updated {
                new_title,
                new_status,
                assigned_to,
                ..
            } => {
                if let Some(assignee) = assigned_to {
                    let (message, kind) = if new_status == TaskStatus::Completed.as_str() {
                        (
                            format!("Task completed: {new_title}"),
                            NotificationKind::TaskCompleted,
                        )
                    } else {
                        (
                            format!("Task updated: {new_title}"),
                            NotificationKind::TaskUpdated,
                        )
                    };
                    Self::send(pool, *assignee, &message, kind).await?;
                }
                Self::alert_admins(
                    pool,
                    &event.actor,
                    &format!("User {} updated task \"{new_title}\"", event.actor.username),
                )
                .await?;
            }
            TaskChange::Deleted { title } => {
                Self::alert_admins(
                    pool,
                    &event.actor,
                    &format!("User {} deleted task \"{title}\"", event.actor.username),
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Insert one notification addressed to `recipient`.
    async fn send(
        pool: &DbPool,
        recipient: DbId,
        message: &str,
        kind: NotificationKind,
    ) -> Result<(), sqlx::Error> {
        NotificationRepo::create(pool, recipient, recipient, message, kind.as_str()).await?;
        Ok(())
    }

    /// Alert every admin about a non-admin actor's change.
    async fn alert_admins(pool: &DbPool, actor: &Actor, message: &str) -> Result<(), sqlx::Error> {
        if actor.role == ROLE_ADMIN {
            return Ok(());
        }
        for admin_id in UserRepo::list_ids_by_role(pool, ROLE_ADMIN).await? {
            Self::send(pool, admin_id, message, NotificationKind::AdminAlert).await?;
        }
        Ok(())
    }
}
