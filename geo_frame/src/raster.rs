//! Conversion between scattered point/value samples and dense grids.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{GeoFrameError, Result};
use crate::transform::normalize_homogeneous;

/// Dense grid of accumulated sample values.
///
/// Cells are addressed by integer index in row-major order and the center
/// cell corresponds to coordinate `(0, 0, ...)`. The grid remembers the
/// resolution and base value it was rasterized with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    shape: Vec<usize>,
    resolution: f64,
    base_value: f64,
    data: Vec<f64>,
}

impl Grid {
    /// Per-dimension extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Coordinate units per cell.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Fill value of cells no sample landed in.
    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Value stored at `index`, or `None` when the index is out of range.
    pub fn value(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&id, &extent) in index.iter().zip(self.shape.iter()) {
            if id >= extent {
                return None;
            }
            flat = flat * extent + id;
        }
        self.data.get(flat).copied()
    }
}

/// Rasterizes homogeneous point rows and their paired values into a dense
/// grid of `shape` cells.
///
/// Each point row must carry one more component than `shape` has
/// dimensions and every coordinate must be finite. Rows are normalized,
/// scaled by `resolution` and centered on the grid; points whose rounded
/// index falls outside the grid are silently dropped, and values landing
/// in the same cell accumulate by summation on top of `base_value`.
pub fn rasterize(
    points: &DMatrix<f64>,
    values: &DVector<f64>,
    shape: &[usize],
    resolution: f64,
    base_value: f64,
) -> Result<Grid> {
    if points.nrows() != values.len() {
        return Err(GeoFrameError::LengthMismatch {
            points: points.nrows(),
            values: values.len(),
        });
    }
    if points.ncols() != shape.len() + 1 {
        return Err(GeoFrameError::RowWidthMismatch {
            expected: shape.len() + 1,
            found: points.ncols(),
        });
    }
    for (i, row) in points.row_iter().enumerate() {
        if row.iter().any(|v| !v.is_finite()) {
            return Err(GeoFrameError::NonFiniteCoordinate(i));
        }
    }

    let normalized = normalize_homogeneous(points)?;
    let cells: usize = shape.iter().product();
    let mut data = vec![base_value; cells];

    'point: for i in 0..normalized.nrows() {
        let mut flat = 0usize;
        for (d, &extent) in shape.iter().enumerate() {
            let center = (extent as f64 - 1.0) / 2.0;
            let index = (normalized[(i, d)] / resolution + center).round();
            if index < 0.0 || index >= extent as f64 {
                continue 'point;
            }
            flat = flat * extent + index as usize;
        }
        data[flat] += values[i];
    }

    Ok(Grid {
        shape: shape.to_vec(),
        resolution,
        base_value,
        data,
    })
}

/// Recovers the non-zero cells of `grid` as homogeneous coordinate rows
/// paired with their values.
///
/// Cells are emitted in row-major index order, which need not match the
/// insertion order of the forward direction; cells whose inputs summed to
/// zero are indistinguishable from empty ones. Only grids rasterized with
/// a zero base value can be inverted.
pub fn derasterize(grid: &Grid) -> Result<(DMatrix<f64>, DVector<f64>)> {
    if grid.base_value != 0.0 {
        return Err(GeoFrameError::NonZeroBase(grid.base_value));
    }
    let dims = grid.shape.len();
    let mut coords = Vec::new();
    let mut values = Vec::new();
    let mut index = vec![0usize; dims];
    for &cell in &grid.data {
        if cell != 0.0 {
            for (d, &id) in index.iter().enumerate() {
                let center = (grid.shape[d] as f64 - 1.0) / 2.0;
                coords.push((id as f64 - center) * grid.resolution);
            }
            coords.push(1.0);
            values.push(cell);
        }
        for d in (0..dims).rev() {
            index[d] += 1;
            if index[d] < grid.shape[d] {
                break;
            }
            index[d] = 0;
        }
    }
    let rows = values.len();
    Ok((
        DMatrix::from_row_slice(rows, dims + 1, &coords),
        DVector::from_vec(values),
    ))
}
