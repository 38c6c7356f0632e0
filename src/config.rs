//! Environment-driven configuration.
//!
//! Settings come from process environment variables, optionally seeded from
//! a `.env` file in the working directory:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `DATABASE_URL` | required | `PostgreSQL` connection string |
//! | `TASKPANDA_DB_POOL_SIZE` | `10` | maximum pooled connections |
//! | `TASKPANDA_DB_CONNECT_TIMEOUT_SECS` | `5` | pool checkout timeout |
//! | `TASKPANDA_TASK_TRANSITIONS` | `permissive` | `permissive` or `strict` |

use std::time::Duration;

use thiserror::Error;

use crate::task::domain::{ParseTransitionPolicyError, TransitionPolicy};

const DATABASE_URL: &str = "DATABASE_URL";
const POOL_SIZE: &str = "TASKPANDA_DB_POOL_SIZE";
const CONNECT_TIMEOUT: &str = "TASKPANDA_DB_CONNECT_TIMEOUT_SECS";
const TASK_TRANSITIONS: &str = "TASKPANDA_TASK_TRANSITIONS";

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be parsed.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Connection settings for the `PostgreSQL` store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    max_connections: u32,
    connect_timeout: Duration,
}

impl StoreConfig {
    /// Creates store settings with default pool sizing.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_POOL_SIZE,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long a pool checkout may wait.
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Returns the connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Complete marketplace configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// Store connection settings.
    pub store: StoreConfig,
    /// Rules for explicit task status updates.
    pub task_transitions: TransitionPolicy,
}

impl MarketplaceConfig {
    /// Reads configuration from the process environment, loading `.env`
    /// first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's
    /// value or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is missing or any value
    /// fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;
        let max_connections = read(POOL_SIZE)
            .map(|value| parse_pool_size(&value))
            .transpose()?
            .unwrap_or(DEFAULT_POOL_SIZE);
        let timeout_secs = read(CONNECT_TIMEOUT)
            .map(|value| {
                value.parse::<u64>().map_err(|err| ConfigError::Invalid {
                    name: CONNECT_TIMEOUT,
                    reason: err.to_string(),
                    value,
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let task_transitions = read(TASK_TRANSITIONS)
            .map(|value| {
                TransitionPolicy::try_from(value.as_str()).map_err(
                    |err: ParseTransitionPolicyError| ConfigError::Invalid {
                        name: TASK_TRANSITIONS,
                        reason: err.to_string(),
                        value,
                    },
                )
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            store: StoreConfig::new(database_url)
                .with_max_connections(max_connections)
                .with_connect_timeout(Duration::from_secs(timeout_secs)),
            task_transitions,
        })
    }
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: POOL_SIZE,
        value: value.to_owned(),
        reason,
    };
    let size = value.parse::<u32>().map_err(|err| invalid(err.to_string()))?;
    if size == 0 {
        return Err(invalid("pool size must be at least 1".to_owned()));
    }
    Ok(size)
}
