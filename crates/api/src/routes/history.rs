//! Route definitions for the `/history` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/history`.
///
/// ```text
/// GET  /  -> list (?taskId=&limit=)
/// POST /  -> create (manual audit entry)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(history::list).post(history::create))
}
