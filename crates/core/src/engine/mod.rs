//! Boundary between the editor and the simulation engine
//!
//! The engine is a separately built module that owns the grid memory. The
//! only thing it exposes here is `place_boundary_line`, which burns one
//! grid-space segment into that memory and returns once the write is done.

pub mod line_burner;

pub use line_burner::LineBurner;

use crate::core_types::Segment;

/// Capability offered by the external simulation engine.
///
/// Injected into whatever issues commit-time calls, so the editor can be
/// exercised without a real engine.
pub trait BoundaryEngine {
    /// Burn the line `(x0, y0) -> (x1, y1)` into the grid.
    ///
    /// Coordinates are grid cells; `width` is the field's row stride.
    /// Implementations mutate the shared region synchronously.
    fn place_boundary_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32);
}

impl<E: BoundaryEngine + ?Sized> BoundaryEngine for Box<E> {
    fn place_boundary_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32) {
        (**self).place_boundary_line(x0, y0, x1, y1, width);
    }
}

/// Engine that only records what it was asked to place.
///
/// Useful for dry runs and for checking the order of calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingEngine {
    calls: Vec<(Segment, i32)>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far as `(segment, width)`, oldest first
    pub fn calls(&self) -> &[(Segment, i32)] {
        &self.calls
    }

    /// Recorded segments without the stride
    pub fn segments(&self) -> Vec<Segment> {
        self.calls.iter().map(|(segment, _)| *segment).collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl BoundaryEngine for RecordingEngine {
    fn place_boundary_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32) {
        self.calls.push((Segment::new(x0, y0, x1, y1), width));
    }
}
