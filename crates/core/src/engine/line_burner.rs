//! Reference engine that burns lines straight into linear memory.
//!
//! Stands in for the real simulation module in headless runs and tests: it
//! writes a fixed value along each line into the same region a
//! [`SharedGrid`](crate::grid::SharedGrid) is attached to, so the grid sees
//! the result on its next read. It does not model any simulation behavior.

use crate::engine::BoundaryEngine;
use crate::grid::RegionLayout;
use std::ptr::NonNull;
use tracing::trace;

/// Value written into boundary cells
pub const BOUNDARY_VALUE: f32 = 1.0;

/// Bresenham line writer over a raw `f32` region.
#[derive(Debug)]
pub struct LineBurner {
    region: NonNull<f32>,
    region_len: usize,
    element_offset: usize,
    height: usize,
    value: f32,
    cells_burned: usize,
}

impl LineBurner {
    /// Burner writing into the field described by `layout`.
    ///
    /// # Safety
    /// `region` must be valid for reads and writes of `region_len` `f32`
    /// values for as long as the burner is used, and no Rust reference to
    /// those elements may be alive during `place_boundary_line`.
    pub unsafe fn new(region: NonNull<f32>, region_len: usize, layout: &RegionLayout) -> Self {
        Self {
            region,
            region_len,
            element_offset: layout.element_offset(),
            height: layout.dims().height(),
            value: BOUNDARY_VALUE,
            cells_burned: 0,
        }
    }

    /// Use `value` instead of [`BOUNDARY_VALUE`] for burned cells
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Cells written so far (a cell hit twice counts twice)
    pub fn cells_burned(&self) -> usize {
        self.cells_burned
    }

    fn burn(&mut self, x: i64, y: i64, width: i64) {
        if x < 0 || y < 0 || x >= width || y >= self.height as i64 {
            return;
        }
        let index = self.element_offset + (y * width + x) as usize;
        if index >= self.region_len {
            return;
        }
        // SAFETY: `index < region_len`, and `new` requires the region to be
        // valid for writes of `region_len` elements.
        unsafe { self.region.as_ptr().add(index).write(self.value) };
        self.cells_burned += 1;
    }
}

impl BoundaryEngine for LineBurner {
    fn place_boundary_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32) {
        if width <= 0 {
            return;
        }
        let width = i64::from(width);
        let Some((x0, y0, x1, y1)) = clip_to_grid(
            (f64::from(x0), f64::from(y0)),
            (f64::from(x1), f64::from(y1)),
            (width - 1) as f64,
            (self.height as f64) - 1.0,
        ) else {
            trace!("Line lies outside the grid");
            return;
        };

        // Integer Bresenham over all octants
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.burn(x, y, width);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Liang-Barsky clip of a line to `[0, x_max] x [0, y_max]`.
///
/// Keeps the walk bounded when pointer input lands far outside the grid.
/// Returns rounded endpoints, or `None` if nothing of the line is inside.
fn clip_to_grid(
    start: (f64, f64),
    end: (f64, f64),
    x_max: f64,
    y_max: f64,
) -> Option<(i64, i64, i64, i64)> {
    let (x0, y0) = start;
    let dx = end.0 - x0;
    let dy = end.1 - y0;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;

    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t_exit {
                return None;
            }
            t_enter = t_enter.max(r);
        } else {
            if r < t_enter {
                return None;
            }
            t_exit = t_exit.min(r);
        }
    }

    Some((
        (x0 + t_enter * dx).round() as i64,
        (y0 + t_enter * dy).round() as i64,
        (x0 + t_exit * dx).round() as i64,
        (y0 + t_exit * dy).round() as i64,
    ))
}
