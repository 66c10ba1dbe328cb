//! Cache trait definition for dependency injection.

use crate::cache::types::{CacheError, CacheKey};
use crate::feature::CandidateFeature;
use std::time::Duration;

/// Cache abstraction over raw per-source feature sets.
///
/// Enables different caching strategies (in-memory TTL, no-op) to be used
/// interchangeably by the aggregator. Implementations must tolerate
/// concurrent access; callers racing on the same key may each fetch and
/// overwrite (best-effort single-flight).
pub trait FeatureCache: Send + Sync {
    /// Returns the cached feature set for the key, or `None` on a miss.
    ///
    /// An entry older than its TTL is a miss; a miss never errors. An
    /// implementation that cannot read an entry must also report a miss
    /// rather than fail the lookup.
    fn get(&self, key: &CacheKey) -> Option<Vec<CandidateFeature>>;

    /// Stores a feature set under the key with the given time-to-live.
    ///
    /// Replaces any existing entry for the key.
    fn put(
        &self,
        key: CacheKey,
        features: Vec<CandidateFeature>,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Removes the entry for the key, if present.
    fn invalidate(&self, key: &CacheKey);

    /// Removes all entries.
    fn clear(&self);

    /// Returns the number of live entries (expired entries may be counted
    /// until their next access evicts them).
    fn len(&self) -> usize;

    /// Returns true if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// No-op cache implementation that never stores anything.
///
/// Always reports a miss. Used for `--no-cache` runs and for exercising
/// adapter paths in tests without cache interference.
#[derive(Debug, Clone, Default)]
pub struct NoOpCache;

impl NoOpCache {
    /// Creates a new no-op cache.
    pub fn new() -> Self {
        Self
    }
}

impl FeatureCache for NoOpCache {
    fn get(&self, _key: &CacheKey) -> Option<Vec<CandidateFeature>> {
        None // Always miss
    }

    fn put(
        &self,
        _key: CacheKey,
        _features: Vec<CandidateFeature>,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(()) // Accept but don't store
    }

    fn invalidate(&self, _key: &CacheKey) {}

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}
