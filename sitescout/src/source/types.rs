//! Source adapter types and traits

use crate::feature::{CandidateFeature, Category};
use crate::geo::Coordinate;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching from a data source.
///
/// Adapters never panic or raise past their own boundary; every provider
/// fault is expressed as one of these variants. The aggregator maps
/// `Timeout`/`Unavailable` to a degraded `source-unavailable` category
/// status and the rest to `source-error`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// HTTP transport failure (connect, DNS, TLS, non-2xx status)
    #[error("network error: {0}")]
    Network(String),

    /// Provider responded but the payload was not the expected shape
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// The request exceeded its time budget
    #[error("request timed out")]
    Timeout,

    /// The provider is reachable but refusing service
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for geospatial data sources.
///
/// Implementors translate one provider's native query mechanism into
/// normalized [`CandidateFeature`]s near a point. The aggregator and ranker
/// depend only on this interface, never on provider-specific types, so
/// sources can be added or removed without touching ranking logic.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetches candidate features near `point` within `radius_km`.
    ///
    /// An empty result is a valid outcome, not an error. Implementations
    /// issue one or more provider requests and normalize the response;
    /// every failure mode surfaces as a [`FetchError`].
    async fn fetch(
        &self,
        point: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<CandidateFeature>, FetchError>;

    /// The category this adapter serves.
    fn category(&self) -> Category;

    /// The adapter's name for logging and identification.
    fn name(&self) -> &str;
}
