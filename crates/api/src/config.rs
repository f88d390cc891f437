use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for the pool to close after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Deadline for one pull-next claim in seconds (default: `5`).
    pub assign_next_timeout_secs: u64,
    /// Deadline for one batch rebalance in seconds (default: `10`).
    pub rebalance_timeout_secs: u64,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `ASSIGN_NEXT_TIMEOUT_SECS` | `5`                        |
    /// | `REBALANCE_TIMEOUT_SECS`   | `10`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values and on assignment deadlines below one
    /// second. Postgres reads a zero `statement_timeout` as "no timeout".
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_secs("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_secs("SHUTDOWN_TIMEOUT_SECS", 30),
            assign_next_timeout_secs: deadline_secs(
                "ASSIGN_NEXT_TIMEOUT_SECS",
                env_secs("ASSIGN_NEXT_TIMEOUT_SECS", 5),
            ),
            rebalance_timeout_secs: deadline_secs(
                "REBALANCE_TIMEOUT_SECS",
                env_secs("REBALANCE_TIMEOUT_SECS", 10),
            ),
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn assign_next_deadline(&self) -> Duration {
        Duration::from_secs(self.assign_next_timeout_secs)
    }

    pub fn rebalance_deadline(&self) -> Duration {
        Duration::from_secs(self.rebalance_timeout_secs)
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}

/// Assignment deadlines must be at least one second.
fn deadline_secs(name: &str, secs: u64) -> u64 {
    assert!(secs >= 1, "{name} must be at least 1 second, got {secs}");
    secs
}
