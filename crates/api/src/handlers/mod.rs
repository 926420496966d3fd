//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, delegate to the repositories in `tasklane_db`
//! scoped to the authenticated caller, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod comment;
pub mod history;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
