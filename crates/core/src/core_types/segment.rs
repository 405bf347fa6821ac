//! Grid-space line segments produced at commit time.

use super::dims::GridDims;
use super::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// A rasterized line between two grid-space endpoints.
///
/// Coordinates are `round(normalized * dimension)`, so an endpoint at the
/// far edge of the grid lands on `width`/`height`, one past the last cell.
/// Engines clip as they see fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Segment {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Segment {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Scale two normalized points onto the grid.
    ///
    /// x coordinates scale by width, y coordinates by height, each endpoint
    /// rounded independently.
    pub fn from_points(a: &Vec2, b: &Vec2, dims: GridDims) -> Self {
        let w = dims.width() as f64;
        let h = dims.height() as f64;
        Self {
            x0: to_grid(a.x, w),
            y0: to_grid(a.y, h),
            x1: to_grid(b.x, w),
            y1: to_grid(b.y, h),
        }
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x0, self.y0, self.x1, self.y1)
    }
}

/// Round `coord * dimension` to the nearest integer, ties toward +inf.
///
/// Pointer coordinates are unclamped, so negative values reach this path.
/// Ties go up (`-2.5 -> -2`), unlike `f64::round` which goes away from zero.
/// Values beyond `i32` saturate.
#[inline]
fn to_grid(coord: f64, dimension: f64) -> i32 {
    let v = coord * dimension;
    let floor = v.floor();
    let rounded = if v - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}
