//! In-process [`CounterStore`] for tests and single-node deployments.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::CounterStore;
use crate::error::StoreResult;

#[derive(Default)]
struct StoreState {
    counters: HashMap<String, u64>,
    // (score, member) ordering gives score-ordered pruning for free
    sets: HashMap<String, BTreeSet<(i64, String)>>,
    values: HashMap<String, String>,
    expiries: HashMap<String, Instant>,
}

impl StoreState {
    /// Drops the key everywhere if its TTL has passed.
    fn purge_if_expired(&mut self, key: &str) {
        let expired = self
            .expiries
            .get(key)
            .is_some_and(|deadline| Instant::now() >= *deadline);
        if expired {
            self.remove(key);
        }
    }

    fn remove(&mut self, key: &str) {
        self.counters.remove(key);
        self.sets.remove(key);
        self.values.remove(key);
        self.expiries.remove(key);
    }
}

/// Mutex-guarded hash maps mimicking the counter, sorted-set and value
/// commands of a shared store. Expiry is purged lazily on access.
#[derive(Default)]
pub struct InMemoryCounterStore {
    state: Mutex<StoreState>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str) -> StoreResult<u64> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        let counter = state.counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> StoreResult<()> {
        let mut state = self.state.lock();
        state
            .expiries
            .insert(key.to_string(), Instant::now() + Duration::from_secs(ttl_secs));
        Ok(())
    }

    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        Ok(state.counters.get(key).copied())
    }

    async fn prune_set(&self, key: &str, max_score: i64) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        if let Some(set) = state.sets.get_mut(key) {
            set.retain(|(score, _)| *score > max_score);
        }
        Ok(())
    }

    async fn add_to_set(&self, key: &str, score: i64, member: &str) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        state
            .sets
            .entry(key.to_string())
            .or_default()
            .insert((score, member.to_string()));
        Ok(())
    }

    async fn set_len(&self, key: &str) -> StoreResult<u64> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        Ok(state.sets.get(key).map(|s| s.len() as u64).unwrap_or(0))
    }

    async fn get_value(&self, key: &str) -> StoreResult<Option<String>> {
        let mut state = self.state.lock();
        state.purge_if_expired(key);
        Ok(state.values.get(key).cloned())
    }

    async fn set_value(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.values.insert(key.to_string(), value.to_string());
        state
            .expiries
            .insert(key.to_string(), Instant::now() + Duration::from_secs(ttl_secs));
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.state.lock().remove(key);
        Ok(())
    }

    async fn delete_matching(&self, prefix: &str) -> StoreResult<u64> {
        let mut state = self.state.lock();
        let matching: Vec<String> = state
            .counters
            .keys()
            .chain(state.sets.keys())
            .chain(state.values.keys())
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for key in &matching {
            state.remove(key);
        }
        Ok(matching.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_and_get() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.increment("c").await.unwrap(), 1);
        assert_eq!(store.increment("c").await.unwrap(), 2);
        assert_eq!(store.get_count("c").await.unwrap(), Some(2));
        assert_eq!(store.get_count("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_counter_restarts() {
        let store = InMemoryCounterStore::new();
        store.increment("c").await.unwrap();
        store.expire("c", 0).await.unwrap();
        assert_eq!(store.increment("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sorted_set_prune() {
        let store = InMemoryCounterStore::new();
        store.add_to_set("s", 100, "a").await.unwrap();
        store.add_to_set("s", 200, "b").await.unwrap();
        store.add_to_set("s", 300, "c").await.unwrap();
        store.prune_set("s", 200).await.unwrap();
        assert_eq!(store.set_len("s").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_matching_is_prefix_literal() {
        let store = InMemoryCounterStore::new();
        store.increment("quota:42:1").await.unwrap();
        store.increment("quota:42:2").await.unwrap();
        store.increment("quota:421:1").await.unwrap();
        assert_eq!(store.delete_matching("quota:42:").await.unwrap(), 2);
        assert_eq!(store.get_count("quota:421:1").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_values_with_ttl() {
        let store = InMemoryCounterStore::new();
        store.set_value("k", "v", 60).await.unwrap();
        assert_eq!(store.get_value("k").await.unwrap().as_deref(), Some("v"));
        store.delete("k").await.unwrap();
        assert_eq!(store.get_value("k").await.unwrap(), None);
    }
}
