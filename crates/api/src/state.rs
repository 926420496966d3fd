use std::sync::Arc;

use tasklane_core::error::CoreError;
use tasklane_db::DbPool;
use tasklane_events::EventBus;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, absent when `DATABASE_URL` is not set.
    ///
    /// Handlers that need the database go through [`AppState::db`], which
    /// turns the absent pool into a 503 instead of a crash at startup.
    pub db: Option<DbPool>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Event bus carrying task lifecycle events to the background consumers.
    pub event_bus: EventBus,
}

impl AppState {
    /// Borrow the database pool.
    ///
    /// Fails with `CoreError::Unavailable` (HTTP 503) when the server was
    /// started without a configured database.
    pub fn db(&self) -> AppResult<&DbPool> {
        self.db.as_ref().ok_or_else(|| {
            AppError::Core(CoreError::Unavailable("Database not configured".into()))
        })
    }
}
