//! Database connection pool management.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use playdex_core::defaults::{
    DB_CONNECT_TIMEOUT_SECS, DB_IDLE_TIMEOUT_SECS, DB_MAX_CONNECTIONS, DB_MAX_LIFETIME_SECS,
};
use playdex_core::{logging, Error, Result};

/// Environment variable overriding the maximum pool size.
pub const ENV_MAX_CONNECTIONS: &str = "PLAYDEX_DB_MAX_CONNECTIONS";

/// Environment variable overriding the acquire timeout (seconds).
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "PLAYDEX_DB_CONNECT_TIMEOUT_SECS";

/// Pool configuration options.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Idle connection timeout duration.
    pub idle_timeout: Duration,
    /// Maximum connection lifetime.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DB_MAX_CONNECTIONS,
            min_connections: 1,
            connect_timeout: Duration::from_secs(DB_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DB_IDLE_TIMEOUT_SECS),
            max_lifetime: Some(Duration::from_secs(DB_MAX_LIFETIME_SECS)),
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the environment, falling back to defaults.
    ///
    /// Reads [`ENV_MAX_CONNECTIONS`] and [`ENV_CONNECT_TIMEOUT_SECS`]; values
    /// that are present but unparseable are configuration errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(n) = read_env::<u32>(ENV_MAX_CONNECTIONS)? {
            config.max_connections = n;
        }
        if let Some(secs) = read_env::<u64>(ENV_CONNECT_TIMEOUT_SECS)? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pool cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(Error::Config(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the minimum number of connections.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the maximum connection lifetime.
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

/// Create a new PostgreSQL connection pool with default configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Create a new PostgreSQL connection pool with custom configuration.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    config.validate()?;
    let start = Instant::now();

    info!(
        { logging::SUBSYSTEM } = "db",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "create",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_secs = config.connect_timeout.as_secs(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Creating database connection pool"
    );

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout);

    if let Some(max_lifetime) = config.max_lifetime {
        options = options.max_lifetime(max_lifetime);
    }

    let pool = options
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        { logging::SUBSYSTEM } = "db",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "established",
        { logging::POOL_SIZE } = pool.size(),
        { logging::POOL_IDLE } = pool.num_idle(),
        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Log current pool health metrics.
///
/// Emits structured debug-level log with pool size, idle count,
/// and warns if idle connections drop below 1 (potential exhaustion).
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        { logging::SUBSYSTEM } = "db",
        { logging::COMPONENT } = "pool",
        { logging::OPERATION } = "metrics",
        { logging::POOL_SIZE } = size,
        { logging::POOL_IDLE } = idle,
        "Pool health check"
    );

    if idle == 0 && size > 0 {
        warn!(
            { logging::SUBSYSTEM } = "db",
            { logging::COMPONENT } = "pool",
            { logging::POOL_SIZE } = size,
            "Connection pool has no idle connections, potential exhaustion"
        );
    }
}
