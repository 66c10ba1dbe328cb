//! Report aggregation
//!
//! The aggregator is the single place that knows the full category set. It
//! orchestrates cache lookups, adapter fetches, and ranking per category,
//! and guarantees the output mapping is complete even when sources fail.

mod types;

pub use types::{CategoryResult, CategoryStatus, Report, ReportError};

use crate::cache::{CacheKey, FeatureCache};
use crate::feature::Category;
use crate::geo::{Coordinate, GeoError};
use crate::rank;
use crate::source::{FetchError, SourceAdapter};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default per-fetch time budget.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates source adapters into a unified proximity report.
///
/// Categories resolve independently and concurrently; one category's
/// failure never prevents others from completing or changes their status.
/// The cache is the only shared mutable state and is injected, empty at
/// process start, with no teardown requirement.
pub struct ReportAggregator {
    adapters: HashMap<Category, Arc<dyn SourceAdapter>>,
    cache: Arc<dyn FeatureCache>,
    fetch_timeout: Duration,
    cache_ttl: Duration,
    result_cap: usize,
}

impl ReportAggregator {
    /// Creates an aggregator over the given adapters and cache.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, cache: Arc<dyn FeatureCache>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.category(), adapter))
            .collect();
        Self {
            adapters,
            cache,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache_ttl: crate::cache::DEFAULT_TTL,
            result_cap: rank::DEFAULT_RESULT_CAP,
        }
    }

    /// Sets the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the cache entry time-to-live.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the per-category result cap for distance-ranked categories.
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    /// Generates a report covering every category.
    pub async fn generate_report(
        &self,
        point: Coordinate,
        radius_km: f64,
    ) -> Result<Report, ReportError> {
        self.generate_report_for(point, radius_km, &Category::ALL).await
    }

    /// Generates a report for the requested categories.
    ///
    /// Input is re-validated defensively even though callers validate
    /// first; `InvalidInput` aborts before any fetch. Every requested
    /// category appears in the result exactly once, degraded or not.
    pub async fn generate_report_for(
        &self,
        point: Coordinate,
        radius_km: f64,
        categories: &[Category],
    ) -> Result<Report, ReportError> {
        point.validate()?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ReportError::InvalidInput(GeoError::InvalidRadius(radius_km)));
        }

        let mut requested: Vec<Category> = Vec::new();
        for category in categories {
            if !requested.contains(category) {
                requested.push(*category);
            }
        }

        info!(%point, radius_km, categories = requested.len(), "generating report");

        let mut handles = Vec::with_capacity(requested.len());
        for category in &requested {
            let category = *category;
            match self.adapters.get(&category) {
                Some(adapter) => {
                    let adapter = Arc::clone(adapter);
                    let cache = Arc::clone(&self.cache);
                    let fetch_timeout = self.fetch_timeout;
                    let cache_ttl = self.cache_ttl;
                    let cap = if category.is_containment() {
                        1
                    } else {
                        self.result_cap
                    };
                    let handle = tokio::spawn(async move {
                        resolve_category(
                            category,
                            adapter,
                            cache,
                            point,
                            radius_km,
                            fetch_timeout,
                            cache_ttl,
                            cap,
                        )
                        .await
                    });
                    handles.push((category, Some(handle)));
                }
                None => handles.push((category, None)),
            }
        }

        let mut results = BTreeMap::new();
        for (category, handle) in handles {
            let result = match handle {
                Some(handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(%category, error = %e, "category task failed");
                        CategoryResult::degraded(
                            radius_km,
                            CategoryStatus::SourceError,
                            format!("category task failed: {}", e),
                        )
                    }
                },
                None => CategoryResult::degraded(
                    radius_km,
                    CategoryStatus::SourceUnavailable,
                    "no adapter registered for category",
                ),
            };
            results.insert(category, result);
        }

        Ok(Report {
            query: point,
            generated_at: Utc::now(),
            radius_km,
            categories: results,
        })
    }
}

/// Resolves one category: cache lookup, fetch on miss, rank.
#[allow(clippy::too_many_arguments)]
async fn resolve_category(
    category: Category,
    adapter: Arc<dyn SourceAdapter>,
    cache: Arc<dyn FeatureCache>,
    point: Coordinate,
    radius_km: f64,
    fetch_timeout: Duration,
    cache_ttl: Duration,
    cap: usize,
) -> CategoryResult {
    let key = CacheKey::for_query(category, &point, radius_km);

    if let Some(cached) = cache.get(&key) {
        debug!(%category, "cache hit");
        return CategoryResult::from_features(
            radius_km,
            rank::rank(cached, &point, radius_km, cap),
        );
    }

    debug!(%category, source = adapter.name(), "cache miss, fetching");
    match tokio::time::timeout(fetch_timeout, adapter.fetch(&point, radius_km)).await {
        Ok(Ok(features)) => {
            if let Err(e) = cache.put(key, features.clone(), cache_ttl) {
                warn!(%category, error = %e, "failed to cache feature set");
            }
            CategoryResult::from_features(radius_km, rank::rank(features, &point, radius_km, cap))
        }
        Ok(Err(error @ (FetchError::Timeout | FetchError::Unavailable(_)))) => {
            warn!(%category, %error, "source unavailable");
            CategoryResult::degraded(radius_km, CategoryStatus::SourceUnavailable, error.to_string())
        }
        Ok(Err(error)) => {
            warn!(%category, %error, "source error");
            CategoryResult::degraded(radius_km, CategoryStatus::SourceError, error.to_string())
        }
        Err(_) => {
            warn!(%category, timeout = ?fetch_timeout, "fetch exceeded time budget");
            CategoryResult::degraded(
                radius_km,
                CategoryStatus::SourceUnavailable,
                format!("no response within {:?}", fetch_timeout),
            )
        }
    }
}
