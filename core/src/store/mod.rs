//! The key/value store contract the filter engine is written against.
//!
//! Filters never talk to Redis directly; they go through this trait so the
//! engine stays testable against [`memory::MemoryStore`] and swappable onto
//! any backend that can satisfy atomic increment, TTL, and ordered-set
//! semantics. `re_infra::RedisStore` is the production implementation.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a [`Store`] implementation may raise. All of them are treated
/// identically by the engine — they get swallowed by the fallback adapter
/// in [`crate::engine::fallback`] and logged, never propagated to a caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store returned an unexpected value for key {key}: {detail}")]
    UnexpectedValue { key: String, detail: String },

    #[error("store operation failed: {0}")]
    Other(String),
}

/// An ordered-map member/score pair as returned by [`Store::zrange_with_scores`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: Vec<u8>,
    pub score: i64,
}

/// The store operations the filter engine needs. Every method is `async`
/// and fallible; callers route failures through the fallback adapter
/// rather than matching on `StoreError` variants.
#[async_trait]
pub trait Store: Send + Sync {
    /// Atomically increment `key` by 1 and return the new value. Creates
    /// the key (starting from 0) if absent.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Atomically decrement `key` by 1 and return the new value. Creates
    /// the key (starting from 0) if absent.
    async fn decr(&self, key: &str) -> Result<i64, StoreError>;

    /// Read `key`. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Overwrite `key` with `value`, leaving any existing TTL untouched.
    async fn set(&self, key: &str, value: i64) -> Result<(), StoreError>;

    /// Set `key`'s remaining lifetime to `seconds`.
    async fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError>;

    /// Remaining lifetime of `key` in seconds, or 0 if `key` has no TTL or
    /// does not exist.
    async fn ttl(&self, key: &str) -> Result<i64, StoreError>;

    /// Whether `key` currently exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Cardinality of the ordered map at `key`.
    async fn zcard(&self, key: &str) -> Result<i64, StoreError>;

    /// Increment `member`'s score in the ordered map at `key` by `delta`,
    /// creating both the map and the member if absent, and return the new
    /// score.
    async fn zincrby(&self, key: &str, member: &[u8], delta: i64) -> Result<i64, StoreError>;

    /// All members of the ordered map at `key` with their scores, in
    /// ascending score order.
    async fn zrange_with_scores(&self, key: &str) -> Result<Vec<ScoredMember>, StoreError>;
}
