//! Core library for geographic frame transforms and grid rasterization.
//!
//! Converts between geographic (latitude/longitude/heading) positions and
//! local ego-centric Cartesian frames, and between scattered point/value
//! samples and dense grids.

pub mod error;
pub mod geodesy;
pub mod interpolation;
pub mod raster;
pub mod transform;

pub use error::{GeoFrameError, Result};
pub use geodesy::{
    distances_and_bearing, distances_and_bearing_within, haversine_distance, DistanceBearing,
    GeoPoint, PlausibleRanges,
};
pub use interpolation::{
    interpolate, interpolate_angle, interpolate_angle_series, TimeSample, TimeSeries,
};
pub use raster::{derasterize, rasterize, Grid};
pub use transform::{build_transform, normalize_homogeneous, transform_points, Frame};
