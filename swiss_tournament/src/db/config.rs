//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::{env, str::FromStr, time::Duration};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable not set
    #[error("{0} must be set")]
    Missing(String),

    /// Environment variable set but unparsable
    #[error("{var} is invalid: {value:?}")]
    Invalid { var: String, value: String },
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Per-operation timeout in seconds
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 5)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 1)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    /// - `DB_QUERY_TIMEOUT`: Per-operation timeout in seconds (default: 5)
    ///
    /// # Errors
    ///
    /// * `ConfigError::Missing` - `DATABASE_URL` is not set
    /// * `ConfigError::Invalid` - A numeric variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".into()))?;
        Self::from_env_with_url(database_url)
    }

    /// Like [`DatabaseConfig::from_env`], with the URL supplied by the caller
    pub fn from_env_with_url(database_url: String) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 5)?,
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 1)?,
            connection_timeout_secs: parse_env_or("DB_CONNECTION_TIMEOUT", 10)?,
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT", 600)?,
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME", 1800)?,
            query_timeout_secs: parse_env_or("DB_QUERY_TIMEOUT", 5)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/tournament` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/tournament".to_string(),
            max_connections: 5,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            query_timeout_secs: 5,
        }
    }

    /// Per-operation timeout
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_env_or<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
