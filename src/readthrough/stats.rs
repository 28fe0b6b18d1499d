//! Read-Through Statistics Module
//!
//! Tracks cache effectiveness: hits, misses, and what the upstream was asked for.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Counters ==
/// Lock-free counters shared by all callers of one read-through helper.
#[derive(Debug, Default)]
pub struct ReadThroughStats {
    hits: AtomicU64,
    misses: AtomicU64,
    upstream_calls: AtomicU64,
    upstream_failures: AtomicU64,
    negative_cached: AtomicU64,
    backend_errors: AtomicU64,
}

impl ReadThroughStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_call(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// An upstream failure that was converted into a cached empty result.
    pub fn record_negative_cached(&self) {
        self.negative_cached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backend_error(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of all counters.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            negative_cached: self.negative_cached.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Point-in-time counter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads answered from the backend
    pub hits: u64,
    /// Reads that found no live entry
    pub misses: u64,
    /// Calls made to the upstream provider
    pub upstream_calls: u64,
    /// Upstream calls that failed
    pub upstream_failures: u64,
    /// Failures cached as empty results
    pub negative_cached: u64,
    /// Backend failures other than a missing key
    pub backend_errors: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
