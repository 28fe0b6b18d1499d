//! Memory Backend
//!
//! Process-local map behind a single lock. Each `set` arms an expiry timer
//! that removes the key once its TTL elapses. Rewriting a key aborts the
//! timer of the previous write; shutdown abandons all of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::cache::{glob_match, CacheBackend, CacheEntry};
use crate::error::{CacheError, Result};
use crate::shutdown::Shutdown;

/// An entry plus the expiry timer armed for it.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    timer: Option<AbortHandle>,
}

type Entries = Arc<Mutex<HashMap<String, Slot>>>;

// == Memory Backend ==
/// In-process backend. Contents are lost when the process exits.
#[derive(Debug)]
pub struct MemoryBackend {
    entries: Entries,
    /// Source of write generations; a timer only deletes the write it was armed for
    generation: AtomicU64,
    shutdown: Shutdown,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend whose timers stop when `shutdown` fires.
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
            shutdown,
        }
    }

    /// Number of stored entries, including expired ones whose timer has not run yet.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn arm_expiry(&self, key: String, ttl: Duration, generation: u64) -> AbortHandle {
        let entries = Arc::clone(&self.entries);
        let mut shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    trace!(key = %key, "Expiry timer abandoned on shutdown");
                }
                _ = tokio::time::sleep(ttl) => {
                    let mut guard = entries.lock().await;
                    if guard.get(&key).is_some_and(|s| s.entry.generation == generation) {
                        guard.remove(&key);
                        trace!(key = %key, "Expired entry removed");
                    }
                }
            }
        })
        .abort_handle()
    }

    #[cfg(test)]
    async fn timer_for(&self, key: &str) -> Option<AbortHandle> {
        self.entries.lock().await.get(key).and_then(|s| s.timer.clone())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let guard = self.entries.lock().await;
        match guard.get(key).map(|s| &s.entry) {
            Some(entry) if !entry.is_expired() => {
                trace!(key = %key, ttl_remaining_ms = ?entry.ttl_remaining_ms(), "Memory hit");
                Ok(entry.value.clone())
            }
            _ => Err(CacheError::NotFound(key.to_string())),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = CacheEntry::new(value, ttl, generation);

        let mut guard = self.entries.lock().await;
        let timer = (!ttl.is_zero()).then(|| self.arm_expiry(key.to_string(), ttl, generation));
        let previous = guard.insert(key.to_string(), Slot { entry, timer });

        if let Some(old_timer) = previous.and_then(|s| s.timer) {
            old_timer.abort();
        }
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let guard = self.entries.lock().await;
        Ok(guard.get(key).is_some_and(|s| !s.entry.is_expired()))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let guard = self.entries.lock().await;
        Ok(guard
            .iter()
            .filter(|(key, slot)| !slot.entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
