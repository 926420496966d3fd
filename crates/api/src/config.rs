//! Process configuration.
//!
//! Everything is read once at startup from the environment (a `.env` file
//! is honoured via dotenvy in `main`). Defaults target local development;
//! deployments override per variable.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Read an env var, falling back to `default`, and parse it.
///
/// Panics with the variable name on unparseable input.
fn env_parsed<T: FromStr>(name: &str, default: &str) -> T {
    let raw = std::env::var(name).unwrap_or_else(|_| default.into());
    raw.parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>()))
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`PORT`, default `3000`).
    pub port: u16,
    /// Allowed CORS origins, comma-separated in `CORS_ORIGINS`.
    /// The single value `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds (`REQUEST_TIMEOUT_SECS`, default `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background consumers to drain
    /// (`SHUTDOWN_TIMEOUT_SECS`, default `30`).
    pub shutdown_timeout_secs: u64,
    /// Insert the default users into an empty database on startup
    /// (`SEED_DEFAULT_USERS`, default `true`).
    pub seed_default_users: bool,
    /// JWT signing secret and expiry.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load the full configuration from the environment.
    ///
    /// Missing variables take their defaults; malformed ones panic at boot.
    pub fn from_env() -> Self {
        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Any value except "false"/"0" counts as enabled.
        let seed_default_users = std::env::var("SEED_DEFAULT_USERS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parsed("PORT", "3000"),
            cors_origins,
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", "30"),
            shutdown_timeout_secs: env_parsed("SHUTDOWN_TIMEOUT_SECS", "30"),
            seed_default_users,
            jwt: JwtConfig::from_env(),
        }
    }
}
