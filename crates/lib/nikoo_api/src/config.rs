//! API server configuration.

use nikoo_core::assistant::config::AssistantConfig;
use nikoo_core::auth::jwt::resolve_jwt_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Whether requests without credentials fall back to the anonymous user.
    pub allow_anonymous: bool,
    /// Assistant provider settings.
    pub assistant: AssistantConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable          | Default                               |
    /// |-------------------|---------------------------------------|
    /// | `BIND_ADDR`       | `127.0.0.1:8000`                      |
    /// | `DATABASE_URL`    | `postgres://localhost:5432/nikoo`     |
    /// | `JWT_SECRET`      | generated & persisted to file         |
    /// | `ALLOW_ANONYMOUS` | `true`                                |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/nikoo".into()),
            jwt_secret: resolve_jwt_secret(),
            allow_anonymous: std::env::var("ALLOW_ANONYMOUS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            assistant: AssistantConfig::from_env(),
        }
    }
}
