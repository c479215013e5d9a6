//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Raised when a hard precondition or a numeric consistency invariant
/// fails. Soft plausibility violations are logged instead, never raised.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeoFrameError {
    /// Interpolation factor outside `[0, 1]`.
    #[error("interpolation factor {0} is outside [0, 1]")]
    FactorOutOfRange(f64),

    /// Angle outside `[0, full_circle]`.
    #[error("angle {angle} is outside [0, {full_circle}]")]
    AngleOutOfRange { angle: f64, full_circle: f64 },

    /// Query time not bracketed by the sampled series.
    #[error("query time {0} is outside the sampled time range")]
    TimeOutOfRange(f64),

    /// Homogeneous rows must carry a trailing scale column.
    #[error("homogeneous rows need a trailing scale column, found no columns")]
    MissingScaleColumn,

    /// A row's last component is zero, so it cannot be normalized.
    #[error("zero homogeneous component in row {0}")]
    ZeroHomogeneousComponent(usize),

    /// Point rows have the wrong number of columns for the operation.
    #[error("point rows are {found} wide, expected {expected}")]
    RowWidthMismatch { expected: usize, found: usize },

    /// Point rows and values must pair one-to-one.
    #[error("{points} point rows paired with {values} values")]
    LengthMismatch { points: usize, values: usize },

    /// Non-finite coordinate.
    #[error("non-finite coordinate in row {0}")]
    NonFiniteCoordinate(usize),

    /// Eastward/northward distances disagree with the crow distance
    /// beyond tolerance.
    #[error(
        "east/north distances ({east} m, {north} m) are inconsistent with crow distance {crow} m"
    )]
    DistanceInconsistent { east: f64, north: f64, crow: f64 },

    /// The signs of the eastward/northward distances disagree with the
    /// quadrant implied by the bearing.
    #[error("east/north signs ({east} m, {north} m) do not match bearing {bearing} rad")]
    BearingSignMismatch { east: f64, north: f64, bearing: f64 },

    /// Only grids filled from a zero base can be inverted back to points.
    #[error("grid base value {0} is not zero, cannot recover points")]
    NonZeroBase(f64),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoFrameError>;
