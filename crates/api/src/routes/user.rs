//! Route definitions for the `/users` resource (admin only).

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`. Every handler requires the `admin` role.
///
/// ```text
/// GET   /      -> list
/// POST  /      -> create
/// PATCH /{id}  -> update (role change)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route("/{id}", patch(user::update))
}
