//! Cache Module
//!
//! A uniform Get/Set/Has/Keys contract over opaque bytes, three backends
//! implementing it, and a typed [`Cache`] handle that owns serialization.

mod entry;
mod file;
mod memory;
mod pattern;
mod remote;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::error::{CacheError, Result};
use crate::shutdown::Shutdown;

// Re-export public types
pub use entry::CacheEntry;
pub use file::{FileBackend, DEFAULT_CACHE_DIR};
pub use memory::MemoryBackend;
pub use pattern::glob_match;
pub use remote::RedisBackend;

// == Backend Contract ==
/// Storage contract shared by every backend.
///
/// Values are opaque bytes; [`Cache`] handles encoding. A key whose TTL has
/// elapsed must behave exactly like a key that was never written.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored bytes, `CacheError::NotFound` if absent or expired,
    /// `CacheError::Io` on storage failure.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Stores `value`, readable until `ttl` elapses. Zero TTL handling is
    /// backend specific; always pass a real TTL.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// True iff a `get` would presently succeed. Never refreshes TTL.
    async fn has(&self, key: &str) -> Result<bool>;

    /// Live keys matching a glob pattern. Not for the request path.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Short backend name for logs and stats.
    fn name(&self) -> &'static str;
}

// == Typed Handle ==
/// Cloneable handle that serializes values to JSON before handing them to
/// the backend, so entries are portable between backend types.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
}

impl Cache {
    /// Wraps a concrete backend.
    pub fn new<B: CacheBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Reads and decodes the value stored under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let bytes = self.backend.get(key).await?;
        decode(key, &bytes)
    }

    /// Encodes and stores `value` under `key` for `ttl`.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let bytes = encode(key, value)?;
        self.backend.set(key, bytes, ttl).await
    }

    pub async fn has(&self, key: &str) -> Result<bool> {
        self.backend.has(key).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.backend.keys(pattern).await
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| CacheError::Serialization(format!("encoding {}: {}", key, e)))
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| CacheError::Serialization(format!("decoding {}: {}", key, e)))
}

// == Startup Selection ==
/// Builds the backend described by `config`. This is the only place the
/// backend type is chosen; everything else works through [`Cache`].
pub async fn connect(config: &BackendConfig, shutdown: Shutdown) -> Result<Cache> {
    match config {
        BackendConfig::Memory => {
            warn!("No Redis configuration found, using in-memory cache");
            Ok(Cache::new(MemoryBackend::new(shutdown)))
        }
        BackendConfig::File { dir } => {
            let backend = FileBackend::new(dir)?;
            info!(dir = %backend.dir().display(), "Using file cache");
            Ok(Cache::new(backend))
        }
        BackendConfig::Redis(redis_config) => {
            let backend = RedisBackend::connect(redis_config).await?;
            info!("Using Redis cache");
            Ok(Cache::new(backend))
        }
    }
}
