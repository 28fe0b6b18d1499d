//! Redis Backend
//!
//! Delegates storage, TTL countdown and pattern scanning to a Redis server.
//! Every command runs under the configured timeout; a timed-out write is
//! abandoned, not rolled back.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::cache::CacheBackend;
use crate::config::RedisConfig;
use crate::error::{CacheError, Result};

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 100;

// == Redis Backend ==
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
    timeout: Duration,
}

impl RedisBackend {
    /// Builds a connection pool and verifies one connection can be opened.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        info!(url = %config.redacted_url(), pool_size = config.pool_size, "Connecting to Redis");

        let mut pool_config = PoolConfig::new(config.pool_size);
        pool_config.timeouts.wait = Some(timeout);
        pool_config.timeouts.create = Some(timeout);
        pool_config.timeouts.recycle = Some(timeout);

        let mut redis_config = deadpool_redis::Config::from_url(config.url.as_str());
        redis_config.pool = Some(pool_config);

        let pool = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Config(format!("invalid Redis configuration: {}", e)))?;

        let backend = Self { pool, timeout };
        backend
            .with_timeout("PING", "", async {
                let mut conn = backend.pool.get().await?;
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(())
            })
            .await?;

        Ok(backend)
    }

    async fn with_timeout<T, F>(&self, command: &str, key: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Io(format!(
                "redis {} {} timed out after {:?}",
                command, key, self.timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.with_timeout("GET", key, async {
            let mut conn = self.pool.get().await?;
            let value: Option<Vec<u8>> = conn.get(key).await?;
            value.ok_or_else(|| CacheError::NotFound(key.to_string()))
        })
        .await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.with_timeout("SET", key, async move {
            let mut conn = self.pool.get().await?;
            if ttl.is_zero() {
                let _: () = conn.set(key, value).await?;
            } else {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                let _: () = conn.pset_ex(key, value, millis).await?;
            }
            debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Redis SET");
            Ok(())
        })
        .await
    }

    async fn has(&self, key: &str) -> Result<bool> {
        self.with_timeout("EXISTS", key, async {
            let mut conn = self.pool.get().await?;
            let exists: bool = conn.exists(key).await?;
            Ok(exists)
        })
        .await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.with_timeout("SCAN", pattern, async {
            let mut conn = self.pool.get().await?;
            let mut keys = Vec::new();
            let mut cursor: u64 = 0;

            loop {
                let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH)
                    .query_async(&mut conn)
                    .await?;
                keys.extend(batch);
                if next == 0 {
                    break;
                }
                cursor = next;
            }

            // SCAN may return a key more than once
            keys.sort();
            keys.dedup();
            Ok(keys)
        })
        .await
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
