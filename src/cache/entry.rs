//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CacheError, Result};

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
///
/// The `generation` tag is assigned once at creation and never reused for the
/// same store. An eviction timer remembers the generation it was scheduled
/// against and removes the entry only while the tag still matches, so a timer
/// that fires after its key was overwritten or deleted acts on nothing.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation instant (monotonic)
    pub created_at: Instant,
    /// Expiration deadline (monotonic)
    pub expires_at: Instant,
    /// Unique tag identifying this installation of the key
    pub generation: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// `Duration` is unsigned, so a negative TTL is unrepresentable by
    /// construction. A zero TTL produces an entry that is already expired.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidTtl` if `now + ttl` overflows the
    /// monotonic clock.
    pub fn new(value: V, ttl: Duration, generation: u64) -> Result<Self> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).ok_or(CacheError::InvalidTtl(ttl))?;

        Ok(Self {
            value,
            created_at: now,
            expires_at,
            generation,
        })
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to the deadline, so an entry created with a zero
    /// TTL is expired immediately.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL, saturating at zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60), 1).unwrap();

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.generation, 1);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_is_expired() {
        let entry = CacheEntry::new("test_value", Duration::ZERO, 1).unwrap();

        assert!(entry.is_expired(), "Zero TTL should expire immediately");
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Duration::from_millis(50), 1).unwrap();

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_overflowing_ttl_rejected() {
        let result = CacheEntry::new("test_value", Duration::MAX, 1);
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(10), 1).unwrap();

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new("test_value", Duration::from_millis(10), 1).unwrap();

        sleep(Duration::from_millis(30));

        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            created_at: now,
            expires_at: now, // Expires exactly at creation time
            generation: 0,
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
