//! In-memory cache with lazy TTL expiry.

use crate::cache::r#trait::FeatureCache;
use crate::cache::types::{CacheError, CacheKey};
use crate::feature::CandidateFeature;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entry in the memory cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Cached feature set
    features: Vec<CandidateFeature>,
    /// Creation time, for TTL expiry
    created: Instant,
    /// Time-to-live for this entry
    ttl: Duration,
}

impl CacheEntry {
    fn new(features: Vec<CandidateFeature>, ttl: Duration) -> Self {
        Self {
            features,
            created: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created.elapsed() >= self.ttl
    }
}

/// In-memory store for raw per-source feature sets.
///
/// Entries expire lazily: an expired entry is evicted on the next access to
/// its key, so no background sweeper is needed. Key cardinality is bounded
/// by [`CacheKey`] bucketing, which keeps growth proportional to the number
/// of distinct sites queried within a TTL window.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty memory cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl FeatureCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<CandidateFeature>> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            // A poisoned lock means a writer panicked mid-insert; report a
            // miss rather than propagate.
            Err(_) => return None,
        };

        let (expired, features) = match entries.get(key) {
            Some(entry) if entry.is_expired() => (true, None),
            Some(entry) => (false, Some(entry.features.clone())),
            None => (false, None),
        };

        if expired {
            entries.remove(key);
            tracing::debug!(category = %key.category, "cache entry expired");
        }
        features
    }

    fn put(
        &self,
        key: CacheKey,
        features: Vec<CandidateFeature>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::LockPoisoned)?;
        entries.insert(key, CacheEntry::new(features, ttl));
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}
