//! Error types for the timed cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the timed cache.
///
/// Missing keys are not an error anywhere in this crate: lookups return
/// `Option` and deletes are idempotent. The only failure mode is a TTL the
/// monotonic clock cannot represent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// TTL cannot be added to the current instant without overflowing
    #[error("Invalid TTL: {0:?} overflows the monotonic clock")]
    InvalidTtl(Duration),
}

// == Result Type Alias ==
/// Convenience Result type for the timed cache.
pub type Result<T> = std::result::Result<T, CacheError>;
