//! Connection pool for the reporting database.
//!
//! The service only reads. Every session is opened read-only, and one report
//! runs up to [`QUERIES_PER_REPORT`] queries at once, so the pool never holds
//! fewer connections than that.

use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;

use crate::config::env_or;

/// Store reads issued concurrently by a single report.
pub const QUERIES_PER_REPORT: u32 = 5;

/// Database pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a report waits for a connection before the store is reported unavailable
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 2 * QUERIES_PER_REPORT,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    /// Reads `DB_*` overrides; unparseable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            acquire_timeout: Duration::from_secs(env_or(
                "DB_ACQUIRE_TIMEOUT",
                defaults.acquire_timeout.as_secs(),
            )),
            idle_timeout: Duration::from_secs(env_or("DB_IDLE_TIMEOUT", defaults.idle_timeout.as_secs())),
            max_lifetime: Duration::from_secs(env_or("DB_MAX_LIFETIME", defaults.max_lifetime.as_secs())),
        }
        .normalized()
    }

    /// Room for at least one full report, and `min <= max`.
    pub fn normalized(mut self) -> Self {
        self.max_connections = self.max_connections.max(QUERIES_PER_REPORT);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }
}

/// Create a database connection pool with configuration from the environment
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::from_env()).await
}

/// Connect to an existing reporting database; the schema is owned elsewhere.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> anyhow::Result<PgPool> {
    let config = config.normalized();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET default_transaction_read_only = on").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await?;

    tracing::info!(
        max = config.max_connections,
        min = config.min_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Read-only reporting pool created"
    );

    Ok(pool)
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

#[derive(Debug, serde::Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub in_use: u32,
    /// Reports that could start on idle connections alone
    pub report_capacity: u32,
}

pub fn get_pool_stats(pool: &PgPool) -> PoolStats {
    let size = pool.size();
    let idle = u32::try_from(pool.num_idle()).unwrap_or(size);
    PoolStats {
        size,
        idle,
        in_use: size.saturating_sub(idle),
        report_capacity: idle / QUERIES_PER_REPORT,
    }
}
