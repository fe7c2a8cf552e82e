//! `PostgreSQL` pool, migrations, and the two transaction flavours the game
//! uses.
//!
//! Handlers run at the default `READ COMMITTED` level and serialize on the
//! caller's balance row. The production tick reads every animal and every
//! plot's fill level, so it runs at `REPEATABLE READ` and sees one snapshot.
//!
//! Queries are built at runtime, so the workspace builds without a live
//! database.

use std::time::Duration;

use homestead_core::config::DatabaseConfig;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;

/// Idle connections are recycled after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Shared handle to the game database.
#[derive(Debug, Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Open a pool sized and timed by the `database` config section.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL does not parse, or
    /// [`DbError::Postgres`] if no connection can be made.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options: PgConnectOptions = config
            .url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("invalid database.url: {e}")))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(IDLE_TIMEOUT)
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Open a pool for `url` with the default sizing.
    ///
    /// # Errors
    ///
    /// Same as [`PostgresPool::connect`].
    pub async fn connect_url(url: &str) -> Result<Self, DbError> {
        let config = DatabaseConfig {
            url: url.to_owned(),
            ..DatabaseConfig::default()
        };
        Self::connect(&config).await
    }

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if a migration fails or the recorded
    /// history disagrees with the embedded one.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// A pooled connection for lock-free reads.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the pool times out.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        Ok(self.pool.acquire().await?)
    }

    /// A `READ COMMITTED` transaction. Dropping it uncommitted rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the pool times out.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        Ok(self.pool.begin().await?)
    }

    /// A `REPEATABLE READ` transaction, for work that must see a single
    /// snapshot across several statements.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the pool times out or the level
    /// cannot be set.
    pub async fn begin_repeatable_read(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Wait for checked-out connections to return, then close them.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
