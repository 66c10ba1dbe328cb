//! Core types for the feature cache.

use crate::feature::Category;
use crate::geo::Coordinate;
use thiserror::Error;

/// Cache key uniquely identifying one spatial query against one source.
///
/// Coordinates are bucketed to 3 decimal degrees (~100 m) and the radius to
/// the nearest integer kilometer, so near-identical interactive queries hit
/// the same entry and key cardinality stays bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Source category
    pub category: Category,
    /// Latitude bucket in milli-degrees
    pub lat_millis: i32,
    /// Longitude bucket in milli-degrees
    pub lon_millis: i32,
    /// Radius bucket in whole kilometers
    pub radius_km: u32,
}

impl CacheKey {
    /// Derives the bucketed key for a query.
    pub fn for_query(category: Category, point: &Coordinate, radius_km: f64) -> Self {
        Self {
            category,
            lat_millis: (point.lat * 1000.0).round() as i32,
            lon_millis: (point.lon * 1000.0).round() as i32,
            radius_km: radius_km.round().max(0.0) as u32,
        }
    }
}

/// Cache-related errors.
///
/// An unreadable entry is never surfaced through `get` (it is treated as a
/// miss); these errors cover configuration and write-side faults only.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to acquire the cache lock
    #[error("failed to acquire cache lock")]
    LockPoisoned,

    /// Invalid cache configuration
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),
}
