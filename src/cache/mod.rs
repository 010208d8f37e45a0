//! Cache Module
//!
//! Provides in-process key-value storage with per-entry TTL expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TimedCache;
