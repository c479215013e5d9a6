//! Linear and circular interpolation over irregularly sampled series.

use serde::{Deserialize, Serialize};

use crate::error::{GeoFrameError, Result};

/// Interpolates between the angles `x` and `y` along the shorter arc of a
/// periodic domain of extent `full_circle` (e.g. 360 for degrees).
///
/// `f` is the interpolation factor: 0 returns `x`, 1 returns `y`.
/// Interpolating 355° to 5° at `f = 0.5` yields 0°, not 180°.
pub fn interpolate_angle(x: f64, y: f64, f: f64, full_circle: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&f) {
        return Err(GeoFrameError::FactorOutOfRange(f));
    }
    for angle in [x, y] {
        if !(0.0..=full_circle).contains(&angle) {
            return Err(GeoFrameError::AngleOutOfRange { angle, full_circle });
        }
    }
    let half = full_circle / 2.0;
    let delta = (y - x + half).rem_euclid(full_circle) - half;
    Ok((x + delta * f).rem_euclid(full_circle))
}

/// Single sample of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    pub time: f64,
    pub value: f64,
}

impl TimeSample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Irregularly sampled time series, sorted ascending by time.
pub type TimeSeries = Vec<TimeSample>;

fn bracket(series: &[TimeSample], x: f64) -> Result<(TimeSample, TimeSample, f64)> {
    let split = series.partition_point(|s| s.time <= x);
    if split == 0 || split == series.len() {
        return Err(GeoFrameError::TimeOutOfRange(x));
    }
    let last = series[split - 1];
    let next = series[split];
    // last.time <= x < next.time, so the divisor is never zero
    let t = (x - last.time) / (next.time - last.time);
    Ok((last, next, t))
}

/// Piecewise-linear interpolation of `series` at time `x`.
///
/// `series` must be sorted ascending by time. Fails when `x` lies before
/// the first sample or is not strictly earlier than the last one.
pub fn interpolate(series: &[TimeSample], x: f64) -> Result<f64> {
    let (last, next, t) = bracket(series, x)?;
    Ok(last.value + (next.value - last.value) * t)
}

/// Like [`interpolate`], but the sample values are angles on a periodic
/// domain of extent `full_circle` and the result follows the shorter arc.
pub fn interpolate_angle_series(series: &[TimeSample], x: f64, full_circle: f64) -> Result<f64> {
    let (last, next, t) = bracket(series, x)?;
    interpolate_angle(last.value, next.value, t, full_circle)
}
