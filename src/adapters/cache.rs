use crate::domain::model::BreedRecord;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedRecords {
    fetched_at: Instant,
    records: Vec<BreedRecord>,
}

/// Raw records keyed by `(endpoint, key)`, valid for a fixed TTL or until
/// invalidated. A zero TTL disables caching.
#[derive(Debug, Clone)]
pub struct RecordCache {
    ttl: Duration,
    entries: HashMap<(String, String), CachedRecords>,
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, endpoint: &str, key: &str) -> Option<&[BreedRecord]> {
        self.get_at(endpoint, key, Instant::now())
    }

    pub fn get_at(&self, endpoint: &str, key: &str, now: Instant) -> Option<&[BreedRecord]> {
        let entry = self.entries.get(&(endpoint.to_string(), key.to_string()))?;
        let age = now.saturating_duration_since(entry.fetched_at);
        (age < self.ttl).then_some(entry.records.as_slice())
    }

    pub fn insert(&mut self, endpoint: &str, key: &str, records: Vec<BreedRecord>) {
        self.insert_at(endpoint, key, records, Instant::now());
    }

    pub fn insert_at(&mut self, endpoint: &str, key: &str, records: Vec<BreedRecord>, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            (endpoint.to_string(), key.to_string()),
            CachedRecords {
                fetched_at: now,
                records,
            },
        );
    }

    /// Drops one entry; returns whether it existed.
    pub fn invalidate(&mut self, endpoint: &str, key: &str) -> bool {
        self.entries
            .remove(&(endpoint.to_string(), key.to_string()))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<BreedRecord> {
        vec![BreedRecord {
            name: "Akita".to_string(),
            ..Default::default()
        }]
    }

    #[test]
    fn test_hit_within_ttl_and_expiry() {
        let mut cache = RecordCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at("https://api", "breeds", records(), t0);

        assert_eq!(
            cache.get_at("https://api", "breeds", t0 + Duration::from_secs(59)).map(<[_]>::len),
            Some(1)
        );
        assert!(cache
            .get_at("https://api", "breeds", t0 + Duration::from_secs(60))
            .is_none());
        assert!(cache.get_at("https://api", "other", t0).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = RecordCache::new(Duration::from_secs(60));
        cache.insert("https://api", "breeds", records());
        cache.insert("https://other", "breeds", records());

        assert!(cache.invalidate("https://api", "breeds"));
        assert!(!cache.invalidate("https://api", "breeds"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let mut cache = RecordCache::new(Duration::ZERO);
        cache.insert("https://api", "breeds", records());

        assert!(!cache.is_enabled());
        assert!(cache.is_empty());
        assert!(cache.get("https://api", "breeds").is_none());
    }
}
