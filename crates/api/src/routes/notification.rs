//! Route definitions for the `/notifications` resource.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET   /           -> list (?userId=&unread=&limit=)
/// POST  /           -> create
/// GET   /unread     -> unread_count
/// PUT   /mark-read  -> mark_all_read
/// PATCH /{id}       -> set_read
/// ```
///
/// The fixed segments are registered before `/{id}` so `unread` and
/// `mark-read` never parse as ids.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification::list).post(notification::create),
        )
        .route("/unread", get(notification::unread_count))
        .route("/mark-read", put(notification::mark_all_read))
        .route("/{id}", patch(notification::set_read))
}
