//! Shared counter store port.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Atomic counter and sorted-set operations backing the rate limiter.
///
/// Correctness of quota enforcement rests on the store's own atomic
/// primitives (increment-with-expire, prune-then-add); this layer performs
/// no client-side compare-and-swap.
///
/// Key-pattern note: [`delete_matching`](CounterStore::delete_matching)
/// takes a literal prefix. Callers terminate it at a `:` separator
/// (`rate_limit:user:42:`) so that `user:42` can never match `user:421`.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment a counter, creating it at 1 if absent.
    async fn increment(&self, key: &str) -> StoreResult<u64>;

    /// Set a key's time-to-live in seconds.
    async fn expire(&self, key: &str, ttl_secs: u64) -> StoreResult<()>;

    /// Current counter value, if the key exists.
    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>>;

    /// Remove all sorted-set members with score `<= max_score`.
    async fn prune_set(&self, key: &str, max_score: i64) -> StoreResult<()>;

    /// Add a member with the given score to a sorted set.
    async fn add_to_set(&self, key: &str, score: i64, member: &str) -> StoreResult<()>;

    /// Number of members in a sorted set (0 if the key is absent).
    async fn set_len(&self, key: &str) -> StoreResult<u64>;

    /// Read a string value, if present.
    async fn get_value(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a string value with a time-to-live.
    async fn set_value(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()>;

    /// Delete one key.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Delete every key starting with the given literal prefix; returns
    /// the number of keys removed.
    async fn delete_matching(&self, prefix: &str) -> StoreResult<u64>;
}
