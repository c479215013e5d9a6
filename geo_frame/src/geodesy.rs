//! Great-circle distances and bearings between geographic points.

use log::warn;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{GeoFrameError, Result};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Computes the great-circle distance between two points in meters using
/// the haversine formula on a mean-radius sphere.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Ground distances and bearing from one point to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBearing {
    /// Straight-line ground distance in meters, never negative.
    pub crow_distance: f64,
    /// Signed eastward ground distance in meters.
    pub east_distance: f64,
    /// Signed northward ground distance in meters.
    pub north_distance: f64,
    /// Bearing from the first point to the second in radians, in `[-pi, pi]`.
    pub bearing: f64,
}

/// Soft plausibility limits for computed distances.
///
/// The default reflects local, neighbourhood-scale work (city blocks to a
/// few kilometers). Callers operating at larger scales should pass their
/// own limits to [`distances_and_bearing_within`]; exceeding a limit only
/// logs a warning, it never fails the call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibleRanges {
    /// Largest distance in meters considered plausible.
    pub max_distance: f64,
}

impl Default for PlausibleRanges {
    fn default() -> Self {
        Self {
            max_distance: 10_000.0,
        }
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub(crate) fn near(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

/// Matches the sign/zero pattern of the east/north distances against the
/// quadrant implied by the bearing. Exact-boundary cases first, open
/// quadrants after; bearings outside `[-pi, pi]` are left to the soft
/// range check.
fn octant_consistent(east: f64, north: f64, bearing: f64) -> bool {
    match bearing {
        b if b == 0.0 => east == 0.0 && north >= 0.0,
        b if b == FRAC_PI_2 => east >= 0.0 && north == 0.0,
        b if b == PI || b == -PI => east == 0.0 && north <= 0.0,
        b if b == -FRAC_PI_2 => east <= 0.0 && north == 0.0,
        b if 0.0 < b && b < FRAC_PI_2 => east >= 0.0 && north >= 0.0,
        b if FRAC_PI_2 < b && b < PI => east >= 0.0 && north <= 0.0,
        b if -FRAC_PI_2 < b && b < 0.0 => east <= 0.0 && north >= 0.0,
        b if -PI < b && b < -FRAC_PI_2 => east <= 0.0 && north <= 0.0,
        _ => true,
    }
}

/// Computes crow-flight, eastward and northward ground distances and the
/// bearing from `a` to `b`, with the default plausibility limits.
pub fn distances_and_bearing(a: GeoPoint, b: GeoPoint) -> Result<DistanceBearing> {
    distances_and_bearing_within(a, b, &PlausibleRanges::default())
}

/// Same as [`distances_and_bearing`] with caller-supplied plausibility
/// limits.
///
/// Coordinates outside the physical lat/lon ranges and distances beyond
/// `ranges` are logged and tolerated. The Pythagorean consistency of the
/// three distances (1% relative tolerance) and the bearing/sign table are
/// enforced and fail the call when violated.
pub fn distances_and_bearing_within(
    a: GeoPoint,
    b: GeoPoint,
    ranges: &PlausibleRanges,
) -> Result<DistanceBearing> {
    for (label, lat) in [("first", a.lat), ("second", b.lat)] {
        if !(-90.0..=90.0).contains(&lat) {
            warn!("{label} latitude looks wrong (value was {lat})");
        }
    }
    for (label, lon) in [("first", a.lon), ("second", b.lon)] {
        if !(-180.0..=180.0).contains(&lon) {
            warn!("{label} longitude looks wrong (value was {lon})");
        }
    }

    let mean_lat = (a.lat + b.lat) / 2.0;
    let mean_lon = (a.lon + b.lon) / 2.0;
    let crow_distance = haversine_distance(a, b);
    let east_distance = sign(b.lon - a.lon)
        * haversine_distance(GeoPoint::new(mean_lat, a.lon), GeoPoint::new(mean_lat, b.lon));
    let north_distance = sign(b.lat - a.lat)
        * haversine_distance(GeoPoint::new(a.lat, mean_lon), GeoPoint::new(b.lat, mean_lon));

    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let bearing = (dlon.sin() * lat_b.cos())
        .atan2(lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * dlon.cos());

    if !(0.0..=ranges.max_distance).contains(&crow_distance) {
        warn!("crow distance looks wrong (value was {crow_distance} m)");
    }
    for (label, dist) in [("east", east_distance), ("north", north_distance)] {
        if !(-ranges.max_distance..=ranges.max_distance).contains(&dist) {
            warn!("{label} distance looks wrong (value was {dist} m)");
        }
    }
    if !(-PI..=PI).contains(&bearing) {
        warn!("bearing looks wrong (value was {bearing} rad)");
    }

    if !near(
        east_distance.powi(2) + north_distance.powi(2),
        crow_distance.powi(2),
        0.01,
        1e-9,
    ) {
        return Err(GeoFrameError::DistanceInconsistent {
            east: east_distance,
            north: north_distance,
            crow: crow_distance,
        });
    }
    if !octant_consistent(east_distance, north_distance, bearing) {
        return Err(GeoFrameError::BearingSignMismatch {
            east: east_distance,
            north: north_distance,
            bearing,
        });
    }

    Ok(DistanceBearing {
        crow_distance,
        east_distance,
        north_distance,
        bearing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        let p = GeoPoint::new(48.1, 11.5);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn haversine_one_millidegree_of_latitude() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0));
        assert!((d - 111.195).abs() < 0.05);
    }

    #[test]
    fn bearing_due_north() {
        let db = distances_and_bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0)).unwrap();
        assert_eq!(db.bearing, 0.0);
        assert_eq!(db.east_distance, 0.0);
        assert!(db.north_distance > 0.0);
        assert!((db.north_distance - db.crow_distance).abs() < 1e-6);
    }

    #[test]
    fn bearing_due_east() {
        let db = distances_and_bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001)).unwrap();
        assert!((db.bearing - FRAC_PI_2).abs() < 1e-12);
        assert!(db.east_distance > 0.0);
        assert_eq!(db.north_distance, 0.0);
    }

    #[test]
    fn bearing_due_south_is_pi() {
        let db = distances_and_bearing(GeoPoint::new(0.001, 0.0), GeoPoint::new(0.0, 0.0)).unwrap();
        assert!((db.bearing - PI).abs() < 1e-12);
        assert!(db.north_distance < 0.0);
    }

    #[test]
    fn southwest_quadrant_signs() {
        let db =
            distances_and_bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(-0.001, -0.001)).unwrap();
        assert!(db.bearing > -PI && db.bearing < -FRAC_PI_2);
        assert!(db.east_distance < 0.0);
        assert!(db.north_distance < 0.0);
    }

    #[test]
    fn pythagorean_consistency_diagonal() {
        let db =
            distances_and_bearing(GeoPoint::new(50.0, 10.0), GeoPoint::new(50.01, 10.01)).unwrap();
        let lhs = db.east_distance.powi(2) + db.north_distance.powi(2);
        let rhs = db.crow_distance.powi(2);
        assert!((lhs - rhs).abs() <= 0.01 * rhs);
    }

    #[test]
    fn implausible_latitude_is_tolerated() {
        // out-of-range coordinates only log, they never fail the call
        let db = distances_and_bearing(GeoPoint::new(95.0, 0.0), GeoPoint::new(95.001, 0.0));
        assert!(db.is_ok());
    }

    #[test]
    fn custom_ranges_do_not_fail_large_distances() {
        let ranges = PlausibleRanges {
            max_distance: 1_000_000.0,
        };
        let db = distances_and_bearing_within(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            &ranges,
        )
        .unwrap();
        assert!(db.crow_distance > 100_000.0);
    }
}
