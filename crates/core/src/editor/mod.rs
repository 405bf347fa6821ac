//! Polyline editing and rasterization

pub mod boundary_editor;
pub mod polyline;

// Re-export main types
pub use boundary_editor::{BoundaryEditor, PointOutcome, SNAP_TOLERANCE};
pub use polyline::{BoundarySet, Polyline};
