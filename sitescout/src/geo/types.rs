//! Geographic type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Valid latitude range in decimal degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in decimal degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in kilometers (IUGG R1)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Kilometers-to-miles conversion factor
pub const KM_TO_MI: f64 = 0.621371;

/// A point on the Earth's surface in decimal degrees.
///
/// Construct via [`Coordinate::new`], which rejects out-of-range values
/// before any query can run against them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if latitude or longitude is outside its valid range
    /// or is not a finite number.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Re-checks the range invariant on an already-constructed coordinate.
    ///
    /// Used by the aggregator for defensive validation of caller input.
    pub fn validate(&self) -> Result<(), GeoError> {
        Self::new(self.lat, self.lon).map(|_| ())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Axis-aligned bounding box in decimal degrees.
///
/// Used by adapters that query providers with an envelope rather than a
/// point-plus-distance filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Returns true if the point lies inside the box (edges inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.west..=self.east).contains(&point.lon)
            && (self.south..=self.north).contains(&point.lat)
    }
}

/// Errors that can occur constructing or validating geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is outside the valid range (-90 to 90)
    #[error("invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude is outside the valid range (-180 to 180)
    #[error("invalid longitude: {0} (must be between {MIN_LON} and {MAX_LON})")]
    InvalidLongitude(f64),

    /// Radius must be a positive, finite number of kilometers
    #[error("invalid radius: {0} km (must be positive and finite)")]
    InvalidRadius(f64),
}
