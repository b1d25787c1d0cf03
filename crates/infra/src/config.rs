//! Database configuration loaded from the process environment.
//!
//! | Variable  | Default    |
//! |-----------|------------|
//! | `DB_HOST` | (required) |
//! | `DB_USER` | `user`     |
//! | `DB_PASS` | `password` |
//! | `DB_NAME` | `students` |
//! | `DB_PORT` | `5432`     |

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASS: &str = "DB_PASS";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_PORT: &str = "DB_PORT";

pub const DEFAULT_DB_USER: &str = "user";
pub const DEFAULT_DB_PASS: &str = "password";
pub const DEFAULT_DB_NAME: &str = "students";
pub const DEFAULT_DB_PORT: u16 = 5432;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration loading error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the entries database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection, including connect retries.
    pub acquire_timeout: Duration,
}

impl core::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl DbConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = get(ENV_DB_HOST).ok_or(ConfigError::Missing(ENV_DB_HOST))?;

        let user = get(ENV_DB_USER).unwrap_or_else(|| {
            tracing::warn!("{ENV_DB_USER} not set; using default '{DEFAULT_DB_USER}'");
            DEFAULT_DB_USER.to_string()
        });
        let password = get(ENV_DB_PASS).unwrap_or_else(|| {
            tracing::warn!("{ENV_DB_PASS} not set; using insecure dev default");
            DEFAULT_DB_PASS.to_string()
        });
        let database = get(ENV_DB_NAME).unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        let port = match get(ENV_DB_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: ENV_DB_PORT,
                value: raw,
            })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        })
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}
