//! Bearer-token authentication.
//!
//! [`AuthUser`] is an extractor: adding it as a handler parameter makes the
//! route require a valid JWT and gives the handler the caller's identity.
//! Rejections reuse the standard error envelope, so unauthenticated
//! requests get the same JSON shape as every other failure.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tasklane_core::error::CoreError;
use tasklane_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

/// The caller identified by the request's `Authorization: Bearer` token.
///
/// Deliberately thin: it carries only what the token proves. Anything
/// role-dependent re-reads the user row (see
/// [`RequireAdmin`](crate::middleware::rbac::RequireAdmin)) so that role
/// changes apply to tokens already in the wild.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Database id of the authenticated user (`sub` claim).
    pub user_id: DbId,
    /// Username as of token issue time.
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        // Expired, tampered, and wrongly-signed tokens all collapse into one
        // message; the distinction is not for clients.
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}
