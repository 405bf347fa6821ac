//! Vector type alias for normalized 2D positions.

use nalgebra::Vector2;

/// 2D vector type for points in normalized `[0,1]x[0,1]` space.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`. Double precision
/// matches the pointer coordinates the host hands us, so snapping and
/// rounding see exactly the values the user clicked.
pub type Vec2 = Vector2<f64>;

/// Per-axis proximity test used for snapping.
///
/// Both `|dx|` and `|dy|` must be strictly below `tolerance`. This is a box
/// test in normalized units, not a Euclidean distance, so on a non-square
/// grid the snap region covers a different number of cells per axis.
#[inline]
pub fn within_tolerance(a: &Vec2, b: &Vec2, tolerance: f64) -> bool {
    (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance
}
