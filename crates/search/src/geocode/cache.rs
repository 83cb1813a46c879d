//! TTL-bounded LRU cache for geocoding resolutions.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::GeoResolution;

struct CachedResolution {
    resolution: GeoResolution,
    inserted_at: Instant,
}

/// Capacity-bounded cache with a per-entry time-to-live. Expired entries
/// are dropped lazily on lookup.
pub struct ResolutionCache {
    entries: Mutex<LruCache<String, CachedResolution>>,
    ttl: Duration,
}

impl ResolutionCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<GeoResolution> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(cached) if cached.inserted_at.elapsed() < self.ttl => {
                Some(cached.resolution.clone())
            }
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, resolution: GeoResolution) {
        self.entries.lock().put(
            key,
            CachedResolution {
                resolution,
                inserted_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{GeoPoint, GeoSource, ResolvedAddress};

    fn resolution() -> GeoResolution {
        GeoResolution {
            point: GeoPoint {
                latitude: 4.0511,
                longitude: 9.7679,
            },
            address: ResolvedAddress {
                city: Some("Douala".to_string()),
                ..Default::default()
            },
            confidence: 0.8,
            source: GeoSource::Primary,
        }
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ResolutionCache::new(10, Duration::from_secs(60));
        assert!(cache.get("douala").is_none());
        cache.put("douala".to_string(), resolution());
        assert!(cache.get("douala").is_some());
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = ResolutionCache::new(10, Duration::ZERO);
        cache.put("douala".to_string(), resolution());
        assert!(cache.get("douala").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let cache = ResolutionCache::new(2, Duration::from_secs(60));
        cache.put("a".to_string(), resolution());
        cache.put("b".to_string(), resolution());
        cache.put("c".to_string(), resolution());
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }
}
