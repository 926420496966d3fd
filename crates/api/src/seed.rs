//! Default-user seeding for fresh databases.

use tasklane_core::roles::{ROLE_ADMIN, ROLE_USER};
use tasklane_db::models::user::CreateUser;
use tasklane_db::repositories::UserRepo;
use tasklane_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Accounts inserted into an empty users table: `(username, password, role)`.
const DEFAULT_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin123", ROLE_ADMIN),
    ("user1", "user123", ROLE_USER),
    ("user2", "user123", ROLE_USER),
];

/// Insert the default accounts when the users table is empty.
///
/// Does nothing when any user already exists, so restarting the server
/// never duplicates or resets accounts. No demo projects or tasks are
/// created.
pub async fn seed_default_users(pool: &DbPool) -> AppResult<()> {
    let existing = UserRepo::count(pool).await?;
    if existing > 0 {
        tracing::debug!(existing, "Users already present, skipping seed");
        return Ok(());
    }

    for (username, password, role) in DEFAULT_USERS {
        let hashed = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let create_dto = CreateUser {
            username: (*username).to_string(),
            password_hash: hashed,
            role: (*role).to_string(),
        };
        let user = UserRepo::create(pool, &create_dto).await?;
        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Seeded default user");
    }

    Ok(())
}
