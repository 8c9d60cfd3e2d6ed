//! Database module providing PostgreSQL connection pooling and the
//! tournament repository.
//!
//! Every operation borrows a connection from the pool for its own duration;
//! nothing holds a connection between calls.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;
pub mod repository;
pub mod schema;
pub mod timeouts;

pub use config::{ConfigError, DatabaseConfig};
pub use repository::{PgTournamentRepository, TournamentRepository};

#[cfg(any(test, feature = "mock"))]
pub use repository::mock;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    query_timeout: Duration,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Returns
    ///
    /// * `Result<Database, sqlx::Error>` - Database instance or error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swiss_tournament::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = DatabaseConfig::from_env()?;
    ///     let db = Database::new(&config).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self {
            pool,
            query_timeout: config.query_timeout(),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository over this pool using the configured query timeout
    pub fn repository(&self) -> PgTournamentRepository {
        PgTournamentRepository::new(self.pool.clone()).with_query_timeout(self.query_timeout)
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the tournament tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        schema::ensure_schema(&self.pool).await
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
