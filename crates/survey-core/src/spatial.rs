//! Spherical geometry primitives for coverage planning.

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert degrees longitude to meters at a given latitude.
pub fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}

/// Normalize a bearing to [0, 360) degrees.
pub fn normalize_bearing(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Initial great-circle bearing from point 1 to point 2.
/// Returns degrees clockwise from north, [0, 360).
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `lat`, `lon` - Starting position in degrees
/// * `bearing` - Bearing in degrees (0 = north, 90 = east)
/// * `distance_m` - Distance in meters
///
/// # Returns
/// (new_lat, new_lon) in degrees
pub fn destination(lat: f64, lon: f64, bearing: f64, distance_m: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let bearing_rad = bearing.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Rotate a point about a pivot by `angle_deg`, clockwise positive.
///
/// Keeps the great-circle distance from the pivot unchanged, so meter
/// spacings survive the rotate/sweep/rotate-back round trip.
pub fn rotate_point(
    lat: f64,
    lon: f64,
    pivot_lat: f64,
    pivot_lon: f64,
    angle_deg: f64,
) -> (f64, f64) {
    let radius_m = haversine_distance(pivot_lat, pivot_lon, lat, lon);
    if radius_m <= f64::EPSILON {
        return (lat, lon);
    }
    let heading = bearing_deg(pivot_lat, pivot_lon, lat, lon) + angle_deg;
    destination(pivot_lat, pivot_lon, heading, radius_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(33.6846, -117.8265, 33.6846, -117.8265);
        assert!(dist < 0.001);
    }

    #[test]
    fn bearing_matches_cardinal_directions() {
        assert!(bearing_deg(0.0, 0.0, 1.0, 0.0).abs() < 1e-6);
        assert!((bearing_deg(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-6);
        assert!((bearing_deg(1.0, 0.0, 0.0, 0.0) - 180.0).abs() < 1e-6);
        assert!((bearing_deg(0.0, 1.0, 0.0, 0.0) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_bearing_wraps_into_range() {
        assert_relative_eq!(normalize_bearing(-90.0), 270.0);
        assert_relative_eq!(normalize_bearing(450.0), 90.0);
        assert_relative_eq!(normalize_bearing(360.0), 0.0);
    }

    #[test]
    fn destination_round_trips_distance_and_bearing() {
        let (lat, lon) = destination(33.6846, -117.8265, 37.0, 500.0);
        let dist = haversine_distance(33.6846, -117.8265, lat, lon);
        assert!((dist - 500.0).abs() < 0.01);
        assert!((bearing_deg(33.6846, -117.8265, lat, lon) - 37.0).abs() < 0.01);
    }

    #[test]
    fn rotate_point_round_trip_returns_original() {
        let (pivot_lat, pivot_lon) = (33.6846, -117.8265);
        let (lat, lon) = destination(pivot_lat, pivot_lon, 61.0, 340.0);
        let (r_lat, r_lon) = rotate_point(lat, lon, pivot_lat, pivot_lon, -48.5);
        let (b_lat, b_lon) = rotate_point(r_lat, r_lon, pivot_lat, pivot_lon, 48.5);
        assert!((b_lat - lat).abs() < 1e-9);
        assert!((b_lon - lon).abs() < 1e-9);
    }

    #[test]
    fn rotate_point_preserves_distance_from_pivot() {
        let (pivot_lat, pivot_lon) = (33.6846, -117.8265);
        let (lat, lon) = destination(pivot_lat, pivot_lon, 10.0, 220.0);
        let (r_lat, r_lon) = rotate_point(lat, lon, pivot_lat, pivot_lon, 90.0);
        let radius = haversine_distance(pivot_lat, pivot_lon, r_lat, r_lon);
        assert!((radius - 220.0).abs() < 0.01);
    }

    #[test]
    fn meters_per_degree_at_equator() {
        assert!((meters_per_deg_lat(0.0) - 110_574.0).abs() < 10.0);
        assert!((meters_per_deg_lon(0.0) - 111_319.0).abs() < 10.0);
    }
}
