//! Route composition for the API.

pub mod auth;
pub mod comment;
pub mod health;
pub mod history;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree, mounted at the server root.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
///
/// /projects                    list, create
/// /projects/{id}               get, update, delete
///
/// /tasks                       list, create
/// /tasks/{id}                  get, update, delete
///
/// /comments                    list (?taskId=), create
///
/// /history                     list (?taskId=&limit=), create
///
/// /notifications               list, create
/// /notifications/unread        unread count
/// /notifications/mark-read     mark all read (PUT)
/// /notifications/{id}          set read flag (PATCH)
///
/// /users                       list, create (admin only)
/// /users/{id}                  update role (admin only)
/// ```
///
/// `/health` is mounted separately by the binary entrypoint.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/comments", comment::router())
        .nest("/history", history::router())
        .nest("/notifications", notification::router())
        .nest("/users", user::router())
}
