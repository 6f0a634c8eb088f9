//! Sample grid and its sentinel-padded working copy
//!
//! The contouring engine never reads the caller's grid directly. It works on a
//! [`PaddedGrid`], which surrounds the samples with one extra column/row on
//! every side holding [`PADDING_SENTINEL`]. Because the sentinel is below every
//! level, any region touching the raster edge is closed off by the padding and
//! comes out as a ring instead of an open line.

use crate::error::{ContourError, Result};

/// Largest accepted magnitude for samples and levels
///
/// Keeps every accepted value strictly above [`PADDING_SENTINEL`] and keeps
/// `level - v` and `v2 - v1` finite when one operand is the sentinel.
pub const MAX_SAMPLE_MAGNITUDE: f64 = f64::MAX / 8.0;

/// Value written into the padding border
///
/// Half of `f64::MIN`, four times further from zero than any accepted sample.
pub const PADDING_SENTINEL: f64 = f64::MIN / 2.0;

/// A rectangular grid of samples, indexed `[col][row]`
///
/// Rows grow downwards: row 0 is the top of the raster. Values are stored
/// column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    cols: usize,
    rows: usize,
    values: Vec<f64>,
}

impl SampleGrid {
    /// Build from column vectors (`columns[col][row]`)
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|column| column.len() != rows) {
            return Err(ContourError::configuration(
                "grid is ragged: all columns must have the same length",
            ));
        }
        Self::from_column_major(columns.into_iter().flatten().collect(), cols, rows)
    }

    /// Build from row vectors (`rows[row][col]`), the usual raster reading order
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(ContourError::configuration(
                "grid is ragged: all rows must have the same length",
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_row_major(&flat, width, height)
    }

    /// Build from a flat row-major slice, as delivered by most raster readers
    ///
    /// # Example
    ///
    /// ```
    /// use geo_contour_polygons::SampleGrid;
    ///
    /// let grid = SampleGrid::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
    /// assert_eq!(grid.cols(), 3);
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.get(2, 1), Some(6.0));
    /// ```
    pub fn from_row_major(values: &[f64], width: usize, height: usize) -> Result<Self> {
        if values.len() != width * height {
            return Err(ContourError::configuration(format!(
                "grid has {} values, expected {width}x{height} = {}",
                values.len(),
                width * height
            )));
        }
        let mut column_major = Vec::with_capacity(values.len());
        for col in 0..width {
            for row in 0..height {
                column_major.push(values[row * width + col]);
            }
        }
        Self::from_column_major(column_major, width, height)
    }

    fn from_column_major(values: Vec<f64>, cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(ContourError::configuration(format!(
                "grid must be at least 1x1, got {cols}x{rows}"
            )));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(ContourError::configuration(format!(
                "sample at cell ({}, {}) is not finite: {}",
                idx / rows,
                idx % rows,
                values[idx]
            )));
        }
        if let Some(idx) = values.iter().position(|v| v.abs() > MAX_SAMPLE_MAGNITUDE) {
            return Err(ContourError::configuration(format!(
                "sample at cell ({}, {}) is outside +/-{MAX_SAMPLE_MAGNITUDE:e}: {}",
                idx / rows,
                idx % rows,
                values[idx]
            )));
        }
        Ok(Self { cols, rows, values })
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Sample at (col, row), or `None` outside the grid
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col < self.cols && row < self.rows {
            Some(self.values[col * self.rows + row])
        } else {
            None
        }
    }

    /// Smallest and largest sample
    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// The sample grid wrapped in a one-cell sentinel border
///
/// Padded index `(col, row)` corresponds to sample `(col - 1, row - 1)`.
#[derive(Debug, Clone)]
pub struct PaddedGrid {
    cols: usize,
    rows: usize,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl PaddedGrid {
    /// Copy `grid` into a padded buffer
    pub fn new(grid: &SampleGrid) -> Self {
        let cols = grid.cols + 2;
        let rows = grid.rows + 2;
        let mut values = vec![PADDING_SENTINEL; cols * rows];
        for col in 0..grid.cols {
            let src = &grid.values[col * grid.rows..(col + 1) * grid.rows];
            let start = (col + 1) * rows + 1;
            values[start..start + grid.rows].copy_from_slice(src);
        }
        let (min, max) = grid.min_max();

        Self {
            cols,
            rows,
            values,
            min,
            max,
        }
    }

    /// Number of padded columns (sample columns + 2)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of padded rows (sample rows + 2)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of marching-squares cells across
    pub fn cell_cols(&self) -> usize {
        self.cols - 1
    }

    /// Number of marching-squares cells down
    pub fn cell_rows(&self) -> usize {
        self.rows - 1
    }

    /// Value at a padded index; anything outside reads as the sentinel
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f64 {
        if col < self.cols && row < self.rows {
            self.values[col * self.rows + row]
        } else {
            PADDING_SENTINEL
        }
    }

    /// Smallest real sample
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest real sample
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the samples straddle `level`
    ///
    /// Corners at or above the level count as inside, so a level is crossed
    /// when at least one sample is below it and at least one is not.
    pub fn is_crossed_by(&self, level: f64) -> bool {
        self.min < level && level <= self.max
    }
}
