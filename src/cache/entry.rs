//! Cache Entry Module
//!
//! Defines the structure for individual in-process cache entries with TTL support.

use std::time::Duration;

use chrono::Utc;

// == Cache Entry ==
/// Represents a single stored value with expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized value bytes
    pub value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
    /// Write generation, used by expiry timers to recognise their own write
    pub generation: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry. A zero `ttl` means the entry never expires.
    pub fn new(value: Vec<u8>, ttl: Duration, generation: u64) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            Some(current_timestamp_ms().saturating_add(ttl_ms))
        };

        Self {
            value,
            expires_at,
            generation,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time, so a read at exactly `ttl` already misses.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let remaining = expires - current_timestamp_ms();
            u64::try_from(remaining).unwrap_or(0)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(b"v".to_vec(), Duration::ZERO, 1);

        assert_eq!(entry.value, b"v");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(b"v".to_vec(), Duration::from_secs(60), 7);

        assert!(entry.expires_at.is_some());
        assert_eq!(entry.generation, 7);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(b"v".to_vec(), Duration::from_millis(50), 1);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new(b"v".to_vec(), Duration::from_secs(10), 1);

        let remaining_ms = entry.ttl_remaining_ms().unwrap();
        assert!(remaining_ms <= 10_000);
        assert!(remaining_ms >= 9_000);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: b"v".to_vec(),
            expires_at: Some(now),
            generation: 1,
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
