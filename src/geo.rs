// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Geographic constants and arithmetic shared by the spatial index,
//! the router and the tile selector.

/// Latitude of the upper-left corner of the tiled map region.
pub const ROOT_ULLAT: f64 = 37.892472502;

/// Longitude of the upper-left corner of the tiled map region.
pub const ROOT_ULLON: f64 = -122.2998046875;

/// Latitude of the lower-right corner of the tiled map region.
pub const ROOT_LRLAT: f64 = 37.8318576688;

/// Longitude of the lower-right corner of the tiled map region.
pub const ROOT_LRLON: f64 = -122.2119140625;

/// Latitude of the projection anchor, the center of the map region.
const ROOT_LAT: f64 = (ROOT_ULLAT + ROOT_LRLAT) / 2.0;

/// Longitude of the projection anchor, the center of the map region.
const ROOT_LON: f64 = (ROOT_ULLON + ROOT_LRLON) / 2.0;

/// Scale factor of the projection.
const K0: f64 = 1.0;

/// Radius of Earth used for road distances, in miles.
const EARTH_RADIUS: f64 = 3963.0;

/// Diameter of Earth used for road distances, in miles.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in miles.
///
/// This is the single distance function of the crate: it provides both the
/// edge costs and the heuristic of [shortest_path](crate::shortest_path),
/// which keeps the heuristic admissible.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}

/// Calculates the initial bearing for great-circle travel from the first
/// to the second position, in degrees clockwise from north, in [-180, 180].
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let y = dlon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos();
    y.atan2(x).to_degrees()
}

/// Calculates the signed change of heading between two bearings,
/// normalized to [-180, 180]. Negative changes turn left, positive right.
pub fn bearing_change(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Projects a lon-lat position onto the planar x axis, using a cylindrical
/// transverse Mercator projection anchored at the center of the map region.
///
/// The projection is the single fixed mapping between geographic and planar
/// coordinates: [KdTree](crate::KdTree) queries must use the exact same
/// mapping as the tree build, or nearest-vertex results become inconsistent
/// with the tree's partitioning.
pub fn project_to_x(lon: f64, lat: f64) -> f64 {
    let dlon = (lon - ROOT_LON).to_radians();
    let phi = lat.to_radians();
    let b = dlon.sin() * phi.cos();
    (K0 / 2.0) * ((1.0 + b) / (1.0 - b)).ln()
}

/// Projects a lon-lat position onto the planar y axis. See [project_to_x].
pub fn project_to_y(lon: f64, lat: f64) -> f64 {
    let dlon = (lon - ROOT_LON).to_radians();
    let phi = lat.to_radians();
    K0 * ((phi.tan() / dlon.cos()).atan() - ROOT_LAT.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert_almost_eq!($a, $b, 1e-6)
        };
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn earth_distance_across_the_region() {
        let d = earth_distance(ROOT_ULLAT, ROOT_ULLON, ROOT_LRLAT, ROOT_LRLON);
        assert_almost_eq!(d, 6.3727735352);
        assert_eq!(d, earth_distance(ROOT_LRLAT, ROOT_LRLON, ROOT_ULLAT, ROOT_ULLON));
    }

    #[test]
    fn earth_distance_between_close_positions() {
        assert_eq!(earth_distance(37.87, -122.26, 37.87, -122.26), 0.0);
        assert_almost_eq!(
            earth_distance(37.8750, -122.2600, 37.8755, -122.2595),
            0.0440595841
        );
    }

    #[test]
    fn bearing_of_cardinal_directions() {
        assert_almost_eq!(bearing(37.86, -122.26, 37.87, -122.26), 0.0);
        assert_almost_eq!(bearing(37.87, -122.26, 37.86, -122.26), 180.0);
        assert_almost_eq!(bearing(37.86, -122.26, 37.86, -122.25), 89.9969313292);
        assert_almost_eq!(bearing(37.86, -122.26, 37.86, -122.27), -89.9969313292);
        assert_almost_eq!(bearing(37.86, -122.26, 37.87, -122.25), 38.2865824389);
    }

    #[test]
    fn bearing_change_wraps_around() {
        assert_eq!(bearing_change(10.0, 30.0), 20.0);
        assert_eq!(bearing_change(10.0, -10.0), -20.0);
        assert_eq!(bearing_change(170.0, -170.0), 20.0);
        assert_eq!(bearing_change(-170.0, 170.0), -20.0);
        assert_eq!(bearing_change(-90.0, 90.0), 180.0);
    }

    #[test]
    fn projection_is_anchored_at_the_region_center() {
        assert_eq!(project_to_x(ROOT_LON, 37.86), 0.0);
        assert_almost_eq!(project_to_y(ROOT_LON, ROOT_LAT), 0.0, 1e-15);
    }

    #[test]
    fn projection_preserves_orientation() {
        // x grows towards the east, y grows towards the north
        assert!(project_to_x(-122.24, 37.86) > 0.0);
        assert!(project_to_x(-122.28, 37.86) < 0.0);
        assert!(project_to_y(-122.26, 37.88) > 0.0);
        assert!(project_to_y(-122.26, 37.84) < 0.0);
    }
}
