//! Timed Cache - An in-process key-value store with per-entry TTL
//!
//! Every stored entry carries its own time-to-live; once the TTL elapses the
//! entry is removed automatically by a scheduled eviction task, with no
//! caller polling. Overwrites and deletes cancel the pending timer.

pub mod cache;
pub mod config;
pub mod error;
pub mod guard;

pub use cache::{CacheEntry, CacheStats, TimedCache};
pub use config::Config;
pub use error::{CacheError, Result};
