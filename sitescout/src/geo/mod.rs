//! Geometry kernel
//!
//! Pure functions for great-circle distance, initial compass bearing,
//! 16-point compass labels, and unit conversion. No state, no I/O.

mod types;

pub use types::{
    BoundingBox, Coordinate, GeoError, EARTH_RADIUS_KM, KM_TO_MI, MAX_LAT, MAX_LON, MIN_LAT,
    MIN_LON,
};

/// The 16 compass labels in clockwise order starting at north.
const COMPASS_LABELS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Computes the great-circle distance between two points in kilometers.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// Always returns a finite, non-negative value for valid coordinates.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Computes the initial bearing from `a` toward `b` in degrees.
///
/// This is the forward azimuth along the first leg of the great-circle
/// path, normalized to [0, 360) with 0 = north.
pub fn bearing_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Maps a bearing in degrees to one of the 16 compass labels.
///
/// Each label covers a 22.5° sector centered on its degree value. Boundary
/// bearings round to the nearer label; an exact sector midpoint resolves to
/// the lower-degree label (11.25° is "N", not "NNE").
pub fn compass_label(bearing: f64) -> &'static str {
    let normalized = bearing.rem_euclid(360.0);
    let sector = (normalized - 11.25) / 22.5;
    let index = (sector.ceil() as i64).rem_euclid(16) as usize;
    COMPASS_LABELS[index]
}

/// Converts kilometers to statute miles.
///
/// No rounding is performed here; rounding is a presentation concern.
pub fn km_to_mi(km: f64) -> f64 {
    km * KM_TO_MI
}

/// Builds a bounding box around a point with the given radius.
///
/// Uses the flat-Earth approximation (1° latitude ≈ 111 km, longitude
/// scaled by cos(lat)), which is adequate for the provider envelope
/// queries this feeds.
pub fn bbox_from_point(center: &Coordinate, radius_km: f64) -> BoundingBox {
    let lat_offset = radius_km / 111.0;
    let lon_offset = radius_km / (111.0 * center.lat.to_radians().cos());

    BoundingBox {
        west: center.lon - lon_offset,
        south: center.lat - lat_offset,
        east: center.lon + lon_offset,
        north: center.lat + lat_offset,
    }
}

/// Formats a decimal-degree value as degrees, minutes, seconds.
///
/// Produces strings like `31°54'00.0"N` or `102°18'00.0"W`.
pub fn degrees_to_dms(decimal_degrees: f64, is_longitude: bool) -> String {
    // Decompose in tenths of arcseconds so rounding can never produce a
    // 60.0" carry artifact.
    let tenths = (decimal_degrees.abs() * 36000.0).round() as i64;
    let degrees = tenths / 36000;
    let minutes = (tenths % 36000) / 600;
    let seconds = (tenths % 600) as f64 / 10.0;

    let direction = match (is_longitude, decimal_degrees >= 0.0) {
        (true, true) => "E",
        (true, false) => "W",
        (false, true) => "N",
        (false, false) => "S",
    };

    format!("{}°{:02}'{:04.1}\"{}", degrees, minutes, seconds, direction)
}

/// Formats a coordinate pair as a DMS string.
pub fn format_dms(point: &Coordinate) -> String {
    format!(
        "{}, {}",
        degrees_to_dms(point.lat, false),
        degrees_to_dms(point.lon, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_coordinate_rejects_out_of_range_latitude() {
        assert!(matches!(
            Coordinate::new(90.01, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(-90.01, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_coordinate_rejects_out_of_range_longitude() {
        assert!(matches!(
            Coordinate::new(0.0, 180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -181.0),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_coordinate_accepts_boundary_values() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let midland = coord(31.9973, -102.0779);
        let odessa = coord(31.8457, -102.3676);

        let forward = distance_km(&midland, &odessa);
        let reverse = distance_km(&odessa, &midland);

        assert!((forward - reverse).abs() < 1e-9, "distance must be symmetric");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let point = coord(31.9, -102.3);
        assert_eq!(distance_km(&point, &point), 0.0);
    }

    #[test]
    fn test_distance_known_pair() {
        // Midland to Odessa is roughly 32 km
        let midland = coord(31.9973, -102.0779);
        let odessa = coord(31.8457, -102.3676);

        let d = distance_km(&midland, &odessa);
        assert!(d > 30.0 && d < 34.0, "expected ~32 km, got {}", d);
    }

    #[test]
    fn test_bearing_due_north_and_east() {
        let origin = coord(31.0, -102.0);

        let north = bearing_degrees(&origin, &coord(32.0, -102.0));
        assert!(north.abs() < 0.01, "expected ~0°, got {}", north);

        let east = bearing_degrees(&origin, &coord(31.0, -101.0));
        assert!((east - 90.0).abs() < 0.5, "expected ~90°, got {}", east);
    }

    #[test]
    fn test_bearing_reverse_differs_by_about_180() {
        // For nearby points the reverse bearing is ~180° off; great-circle
        // convergence keeps this from being exact over long separations.
        let a = coord(31.90, -102.30);
        let b = coord(31.95, -102.25);

        let forward = bearing_degrees(&a, &b);
        let reverse = bearing_degrees(&b, &a);
        let diff = (forward - reverse).rem_euclid(360.0);

        assert!(
            (diff - 180.0).abs() < 0.1,
            "forward {} reverse {} diff {}",
            forward,
            reverse,
            diff
        );
    }

    #[test]
    fn test_bearing_is_normalized() {
        let a = coord(31.9, -102.3);
        let b = coord(31.8, -102.4); // southwest of a

        let bearing = bearing_degrees(&a, &b);
        assert!((0.0..360.0).contains(&bearing));
        assert!(bearing > 180.0, "southwest bearing should exceed 180°");
    }

    #[test]
    fn test_compass_label_cardinal_points() {
        assert_eq!(compass_label(0.0), "N");
        assert_eq!(compass_label(90.0), "E");
        assert_eq!(compass_label(180.0), "S");
        assert_eq!(compass_label(270.0), "W");
        assert_eq!(compass_label(359.9), "N");
    }

    #[test]
    fn test_compass_label_intermediate_points() {
        assert_eq!(compass_label(22.5), "NNE");
        assert_eq!(compass_label(45.0), "NE");
        assert_eq!(compass_label(67.5), "ENE");
        assert_eq!(compass_label(315.0), "NW");
        assert_eq!(compass_label(337.5), "NNW");
    }

    #[test]
    fn test_compass_label_midpoint_resolves_to_lower_label() {
        // 11.25° is equidistant between N (0°) and NNE (22.5°)
        assert_eq!(compass_label(11.25), "N");
        assert_eq!(compass_label(33.75), "NNE");
        assert_eq!(compass_label(348.75), "NNW");
    }

    #[test]
    fn test_compass_label_just_past_midpoint() {
        assert_eq!(compass_label(11.26), "NNE");
        assert_eq!(compass_label(348.76), "N");
    }

    #[test]
    fn test_km_to_mi_zero_and_monotonic() {
        assert_eq!(km_to_mi(0.0), 0.0);
        assert!(km_to_mi(1.0) < km_to_mi(2.0));
        assert!((km_to_mi(3.2) - 1.988).abs() < 0.01);
        assert!((km_to_mi(8.7) - 5.406).abs() < 0.01);
    }

    #[test]
    fn test_bbox_from_point_contains_center() {
        let center = coord(31.9, -102.3);
        let bbox = bbox_from_point(&center, 15.0);

        assert!(bbox.contains(&center));
        assert!(bbox.west < center.lon && bbox.east > center.lon);
        assert!(bbox.south < center.lat && bbox.north > center.lat);
    }

    #[test]
    fn test_bbox_from_point_radius_scales_extent() {
        let center = coord(31.9, -102.3);
        let small = bbox_from_point(&center, 5.0);
        let large = bbox_from_point(&center, 50.0);

        assert!(large.north - large.south > small.north - small.south);
        assert!(large.east - large.west > small.east - small.west);
    }

    #[test]
    fn test_bbox_excludes_distant_point() {
        let center = coord(31.9, -102.3);
        let bbox = bbox_from_point(&center, 15.0);

        // Houston is several hundred km east
        assert!(!bbox.contains(&coord(29.76, -95.37)));
    }

    #[test]
    fn test_degrees_to_dms_formatting() {
        assert_eq!(degrees_to_dms(31.9, false), "31°54'00.0\"N");
        assert_eq!(degrees_to_dms(-102.3, true), "102°18'00.0\"W");
        assert_eq!(degrees_to_dms(-31.9, false), "31°54'00.0\"S");
    }

    #[test]
    fn test_format_dms_pair() {
        let point = coord(31.9, -102.3);
        assert_eq!(format_dms(&point), "31°54'00.0\"N, 102°18'00.0\"W");
    }
}
