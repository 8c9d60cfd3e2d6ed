//! CLI configuration management.
//!
//! Consolidates environment variable reads and command-line overrides into a
//! validated configuration.

use swiss_tournament::db::{ConfigError as DatabaseConfigError, DatabaseConfig};

/// Default database when neither `--db-url` nor `DATABASE_URL` is given
const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost/tournament";

/// Complete CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Fixed seed for bye selection (random when unset)
    pub bye_seed: Option<u64>,
    /// Print results as JSON instead of text
    pub json: bool,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL (from `--db-url`)
    /// * `bye_seed_override` - Optional bye seed (from `--seed`)
    /// * `json` - Whether `--json` was given
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but invalid
    pub fn from_env(
        database_url_override: Option<String>,
        bye_seed_override: Option<u64>,
        json: bool,
    ) -> Result<Self, ConfigError> {
        let database_url = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let database = DatabaseConfig::from_env_with_url(database_url)?;

        let bye_seed = match bye_seed_override {
            Some(seed) => Some(seed),
            None => match std::env::var("BYE_SEED") {
                Ok(value) => Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "BYE_SEED".to_string(),
                    reason: format!("Must be an unsigned integer, got {value:?}"),
                })?),
                Err(_) => None,
            },
        };

        Ok(CliConfig {
            database,
            bye_seed,
            json,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.database_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Pass --db-url or set DATABASE_URL".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_QUERY_TIMEOUT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseConfigError),
}
