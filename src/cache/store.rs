//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with per-entry eviction timers.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;
use crate::error::Result;

// == Timer Slot ==
/// A stored entry paired with the handle of its eviction timer.
///
/// Holding exactly one handle per present key is what enforces the
/// one-outstanding-timer-per-key invariant: the handle is aborted whenever
/// the entry leaves the map for any reason other than its own timer firing.
#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    timer: JoinHandle<()>,
}

// == Shared State ==
/// State shared between the store handle and its eviction tasks.
#[derive(Debug)]
struct Shared<K, V> {
    inner: Mutex<Inner<K, V>>,
    /// Monotonic generation counter; never reused within one store
    next_generation: AtomicU64,
}

#[derive(Debug)]
struct Inner<K, V> {
    /// Key-value storage
    entries: HashMap<K, Slot<V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> Shared<K, V> {
    /// Acquires the map lock. A poisoned lock is recovered rather than
    /// propagated: every critical section leaves the map in a valid state
    /// even if a caller panicked while holding the guard.
    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Timed Cache ==
/// In-process key-value store where every entry carries its own TTL.
///
/// Each `set` schedules a tokio timer task that removes the entry once the
/// TTL elapses; callers never poll. Overwriting or deleting a key aborts its
/// pending timer synchronously, and a timer that fires late revalidates the
/// entry's generation tag before removing anything, so a stale timer can
/// never delete a freshly written value.
///
/// All operations take a single internal mutex and complete in bounded time;
/// none of them awaits. The store may be shared across tasks behind an `Arc`.
pub struct TimedCache<K, V> {
    shared: Arc<Shared<K, V>>,
    default_ttl: Duration,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    entries: HashMap::new(),
                    stats: CacheStats::new(),
                }),
                next_generation: AtomicU64::new(0),
            }),
            default_ttl: config.default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with the given TTL.
    ///
    /// If the key already exists, its value is replaced and its pending
    /// eviction timer is cancelled before the new entry becomes visible; the
    /// new TTL starts now. `None` falls back to the configured default TTL.
    /// A zero TTL expires immediately.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidTtl` if the TTL overflows the monotonic
    /// clock. The store is left unmodified: no entry is inserted and no
    /// timer is scheduled.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime, which is needed to schedule
    /// the eviction timer.
    pub fn set(&self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let generation = self.shared.next_generation.fetch_add(1, Ordering::Relaxed);

        // Validate the TTL before touching the map, so a rejected set
        // leaves no partial entry behind.
        let entry = CacheEntry::new(value, ttl, generation)?;

        let mut inner = self.shared.lock();

        // Cancel the previous timer before the new entry is installed; the
        // generation check in the eviction task backstops the same race.
        if let Some(old) = inner.entries.remove(&key) {
            old.timer.abort();
        }

        let timer = spawn_eviction(Arc::downgrade(&self.shared), key.clone(), generation, ttl);
        inner.entries.insert(key, Slot { entry, timer });

        let count = inner.entries.len();
        inner.stats.set_total_entries(count);

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` for a missing or expired key; a missing key is a
    /// normal outcome, not an error. An entry whose deadline has passed but
    /// whose timer has not yet run is evicted here, under the same lock, so
    /// no caller can observe a value past its TTL.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut inner = self.shared.lock();
        let Inner { entries, stats } = &mut *inner;

        match entries.get(key) {
            Some(slot) if !slot.entry.is_expired() => {
                stats.record_hit();
                Some(slot.entry.value.clone())
            }
            Some(_) => {
                // Deadline passed, timer not fired yet.
                if let Some(slot) = entries.remove(key) {
                    slot.timer.abort();
                }
                stats.record_expiration();
                stats.record_miss();
                stats.set_total_entries(entries.len());
                trace!("expired entry evicted on access");
                None
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Contains Key ==
    /// Returns whether a live (non-expired) entry exists for `key`.
    ///
    /// Consistent with `get`: true exactly when `get` would return a value.
    pub fn contains_key(&self, key: &K) -> bool {
        let mut inner = self.shared.lock();
        let Inner { entries, stats } = &mut *inner;

        match entries.get(key) {
            Some(slot) if !slot.entry.is_expired() => true,
            Some(_) => {
                if let Some(slot) = entries.remove(key) {
                    slot.timer.abort();
                }
                stats.record_expiration();
                stats.set_total_entries(entries.len());
                trace!("expired entry evicted on access");
                false
            }
            None => false,
        }
    }

    // == Delete ==
    /// Removes an entry by key, cancelling its pending eviction timer.
    ///
    /// Idempotent: deleting an absent key is a no-op. Returns whether an
    /// entry was removed.
    pub fn delete(&self, key: &K) -> bool {
        let mut inner = self.shared.lock();

        match inner.entries.remove(key) {
            Some(slot) => {
                slot.timer.abort();
                let count = inner.entries.len();
                inner.stats.set_total_entries(count);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry and cancels every pending eviction timer.
    ///
    /// No timer can fire after this returns and resurrect state.
    pub fn clear(&self) {
        let mut inner = self.shared.lock();

        for (_, slot) in inner.entries.drain() {
            slot.timer.abort();
        }
        inner.stats.set_total_entries(0);
        debug!("cache cleared");
    }

    // == TTL Remaining ==
    /// Returns the remaining TTL for a live entry, or `None` if the key is
    /// absent or already expired.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let inner = self.shared.lock();
        inner
            .entries
            .get(key)
            .filter(|slot| !slot.entry.is_expired())
            .map(|slot| slot.entry.ttl_remaining())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.shared.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, including any whose deadline
    /// has passed but whose timer has not yet run.
    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().entries.is_empty()
    }
}

impl<K, V> Default for TimedCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// == Teardown ==
/// Dropping the store aborts all outstanding timers so none outlives its
/// intended lifetime. An eviction task holds only a weak reference, so a
/// task already past its sleep simply finds no store and exits.
impl<K, V> Drop for TimedCache<K, V> {
    fn drop(&mut self) {
        let mut inner = self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, slot) in inner.entries.drain() {
            slot.timer.abort();
        }
    }
}

// == Eviction Task ==
/// Schedules removal of `key` after `ttl`.
///
/// The task removes the key only while the stored generation still matches
/// the one it was scheduled against, so firing after an overwrite or delete
/// is a safe no-op.
fn spawn_eviction<K, V>(
    shared: Weak<Shared<K, V>>,
    key: K,
    generation: u64,
    ttl: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;

        // Store already dropped: nothing to evict.
        let Some(shared) = shared.upgrade() else { return };

        let mut inner = shared.lock();
        let owns = inner
            .entries
            .get(&key)
            .map(|slot| slot.entry.generation)
            == Some(generation);

        if owns {
            inner.entries.remove(&key);
            inner.stats.record_expiration();
            let count = inner.entries.len();
            inner.stats.set_total_entries(count);
            debug!(generation, "TTL elapsed, entry removed");
        }
    })
}
