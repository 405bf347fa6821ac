//! Grid dimensions and the cell/normalized-space coordinate mapping.

use crate::error::GridError;

/// Width and height of a grid in cells.
///
/// Fixed for the lifetime of a grid. The field is row-major with
/// `index = row * width + col`; rows run along y, columns along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    width: usize,
    height: usize,
}

/// Normalized-space rectangle covered by one grid cell.
///
/// Half-open: `[x_min, x_max) x [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl GridDims {
    /// Create validated dimensions.
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` if either side is zero or the
    /// cell count does not fit in `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`)
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major field index of `(row, col)`.
    ///
    /// Out-of-range coordinates are a programming error and panic, even
    /// when `row * width + col` would happen to land inside the field.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        row * self.width + col
    }

    /// Non-panicking variant of [`GridDims::index`].
    #[inline]
    pub fn checked_index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Rectangle in normalized space occupied by cell `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> CellRect {
        let w = self.width as f64;
        let h = self.height as f64;
        CellRect {
            x_min: col as f64 / w,
            y_min: row as f64 / h,
            x_max: (col + 1) as f64 / w,
            y_max: (row + 1) as f64 / h,
        }
    }

    /// Cell containing the normalized point `(x, y)`, as `(row, col)`.
    ///
    /// Returns `None` for points outside `[0,1)x[0,1)`, including NaN.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
            return None;
        }
        let col = ((x * self.width as f64).floor() as usize).min(self.width - 1);
        let row = ((y * self.height as f64).floor() as usize).min(self.height - 1);
        Some((row, col))
    }
}

impl CellRect {
    /// True if the normalized point lies inside this half-open rectangle
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..self.x_max).contains(&x) && (self.y_min..self.y_max).contains(&y)
    }
}
