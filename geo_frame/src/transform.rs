//! Local tangent-plane frames and the homogeneous 2D transform between
//! them.

use log::{debug, warn};
use nalgebra::{DMatrix, Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{GeoFrameError, Result};
use crate::geodesy::{self, GeoPoint};

/// Local 2D Cartesian frame anchored at a geographic point.
///
/// `heading` is the rotation in radians of the frame's local x-axis
/// relative to the true north/east convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Geographic anchor of the frame origin.
    pub origin: GeoPoint,
    /// Heading in radians.
    pub heading: f64,
}

impl Frame {
    /// Creates a new frame definition.
    pub fn new(origin: GeoPoint, heading: f64) -> Self {
        Self { origin, heading }
    }

    /// Saves this frame definition to a JSON file.
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Loads a frame definition from a JSON file.
    pub fn load(path: &str) -> std::io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Divides every row by its last component so the trailing column becomes
/// exactly 1.
///
/// Fails on rows with no columns and on a zero last component (which
/// would otherwise silently produce NaN coordinates).
pub fn normalize_homogeneous(rows: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if rows.ncols() == 0 {
        return Err(GeoFrameError::MissingScaleColumn);
    }
    let last = rows.ncols() - 1;
    let mut out = rows.clone();
    for i in 0..out.nrows() {
        let w = out[(i, last)];
        if w == 0.0 {
            return Err(GeoFrameError::ZeroHomogeneousComponent(i));
        }
        for j in 0..=last {
            out[(i, j)] /= w;
        }
    }
    Ok(out)
}

/// Homogeneous 2D rotation by `angle` radians.
fn rotation(angle: f64) -> Matrix3<f64> {
    Matrix3::new(
        angle.cos(),
        angle.sin(),
        0.0,
        -angle.sin(),
        angle.cos(),
        0.0,
        0.0,
        0.0,
        1.0,
    )
}

/// Homogeneous translation by `dx` along the x-axis.
fn translation(dx: f64) -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0)
}

/// Builds the 3x3 homogeneous transform taking points expressed in
/// `origin`'s frame to `target`'s frame.
///
/// The composite rotates the origin frame's axes to true bearing,
/// translates along the bearing by the ground separation, then rotates
/// into the target frame's heading. Headings larger than 2π in magnitude
/// are logged as implausible but tolerated.
pub fn build_transform(origin: &Frame, target: &Frame) -> Result<Matrix3<f64>> {
    for (label, heading) in [("origin", origin.heading), ("target", target.heading)] {
        if heading.abs() > 2.0 * PI {
            warn!("{label} heading does not look like radians (value was {heading})");
        }
    }

    // displacement from the target anchor toward the origin anchor
    let db = geodesy::distances_and_bearing(target.origin, origin.origin)?;
    if !geodesy::near(
        db.east_distance.powi(2) + db.north_distance.powi(2),
        db.crow_distance.powi(2),
        0.01,
        0.1,
    ) {
        return Err(GeoFrameError::DistanceInconsistent {
            east: db.east_distance,
            north: db.north_distance,
            crow: db.crow_distance,
        });
    }

    debug!("origin heading: {} deg", origin.heading.to_degrees());
    debug!("target heading: {} deg", target.heading.to_degrees());
    debug!("displacement angle: {} deg", db.bearing.to_degrees());

    Ok(rotation(target.heading)
        * rotation(-db.bearing)
        * translation(db.crow_distance)
        * rotation(db.bearing)
        * rotation(-origin.heading))
}

/// Converts 3-wide homogeneous 2D rows from `origin`'s frame to
/// `target`'s frame.
pub fn transform_points(
    points: &DMatrix<f64>,
    origin: &Frame,
    target: &Frame,
) -> Result<DMatrix<f64>> {
    if points.ncols() != 3 {
        return Err(GeoFrameError::RowWidthMismatch {
            expected: 3,
            found: points.ncols(),
        });
    }
    let m = build_transform(origin, target)?;
    let mut out = DMatrix::zeros(points.nrows(), 3);
    for i in 0..points.nrows() {
        let p = Vector3::new(points[(i, 0)], points[(i, 1)], points[(i, 2)]);
        let q = m * p;
        out[(i, 0)] = q.x;
        out[(i, 1)] = q.y;
        out[(i, 2)] = q.z;
    }
    normalize_homogeneous(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coincident(heading: f64) -> Frame {
        Frame::new(GeoPoint::new(0.0, 0.0), heading)
    }

    #[test]
    fn normalize_divides_by_last_column() {
        let rows = DMatrix::from_row_slice(2, 3, &[2.0, 4.0, 2.0, 1.0, 1.0, 1.0]);
        let out = normalize_homogeneous(&rows).unwrap();
        assert_eq!(out[(0, 0)], 1.0);
        assert_eq!(out[(0, 1)], 2.0);
        assert_eq!(out[(0, 2)], 1.0);
        assert_eq!(out[(1, 2)], 1.0);
    }

    #[test]
    fn normalize_rejects_zero_scale() {
        let rows = DMatrix::from_row_slice(1, 3, &[2.0, 4.0, 0.0]);
        assert!(normalize_homogeneous(&rows).is_err());
    }

    #[test]
    fn coincident_frames_give_identity() {
        let m = build_transform(&coincident(0.4), &coincident(0.4)).unwrap();
        let identity: Matrix3<f64> = Matrix3::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert!((m[(i, j)] - identity[(i, j)]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn transform_structure_is_rotation_plus_translation() {
        let origin = Frame::new(GeoPoint::new(52.0, 13.0), 0.3);
        let target = Frame::new(GeoPoint::new(52.001, 13.001), -0.2);
        let m = build_transform(&origin, &target).unwrap();
        // bottom row stays homogeneous
        assert_eq!(m[(2, 0)], 0.0);
        assert_eq!(m[(2, 1)], 0.0);
        assert_eq!(m[(2, 2)], 1.0);
        // orthonormal rotation block
        let (a, b, c, d) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
        assert!((a * a + c * c - 1.0).abs() < 1e-9);
        assert!((b * b + d * d - 1.0).abs() < 1e-9);
        assert!((a * b + c * d).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_homogeneous_rows() {
        let points = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let res = transform_points(&points, &coincident(0.0), &coincident(0.0));
        assert!(res.is_err());
    }

    #[test]
    fn save_load_round_trip() {
        let frame = Frame::new(GeoPoint::new(47.3, 8.5), 1.25);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.json");
        frame.save(path.to_str().unwrap()).unwrap();
        let loaded = Frame::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded, frame);
    }
}
