//! Core types and utilities

pub mod dims;
pub mod segment;
pub mod vec2;

pub use dims::{CellRect, GridDims};
pub use segment::Segment;
pub use vec2::{within_tolerance, Vec2};
