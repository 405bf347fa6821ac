//! Boundary editing state machine.
//!
//! Points arrive in normalized coordinates from pointer events. Each point
//! either extends the current polyline, closes it onto its first point, or
//! ends it at its last point. Undo walks back through finished polylines,
//! and commit drains everything into grid-space segments.

use crate::core_types::{within_tolerance, GridDims, Segment, Vec2};
use crate::editor::polyline::{BoundarySet, Polyline};
use tracing::{debug, info};

/// Snap distance in normalized units, applied to each axis separately
pub const SNAP_TOLERANCE: f64 = 0.01;

/// What [`BoundaryEditor::add_point`] did with a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// Point appended to the current polyline
    Appended,
    /// Point snapped onto the first point; the loop is closed and a new
    /// polyline started
    Closed,
    /// Point snapped onto the last point; nothing appended and a new
    /// polyline started
    Ended,
}

/// Polyline editor for one grid.
#[derive(Debug, Clone)]
pub struct BoundaryEditor {
    dims: GridDims,
    tolerance: f64,
    bounds: BoundarySet,
}

impl BoundaryEditor {
    /// Editor with the default [`SNAP_TOLERANCE`]
    pub fn new(dims: GridDims) -> Self {
        Self::with_tolerance(dims, SNAP_TOLERANCE)
    }

    pub fn with_tolerance(dims: GridDims, tolerance: f64) -> Self {
        Self {
            dims,
            tolerance,
            bounds: BoundarySet::new(),
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn bounds(&self) -> &BoundarySet {
        &self.bounds
    }

    /// All polylines in drawing order, current one last
    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.bounds.polylines()
    }

    /// The polyline being drawn
    pub fn current(&self) -> &Polyline {
        self.bounds.current()
    }

    pub fn polyline_count(&self) -> usize {
        self.bounds.len()
    }

    pub fn point_count(&self) -> usize {
        self.bounds.point_count()
    }

    /// True when nothing has been drawn since creation or the last commit
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Add a point to the current polyline.
    ///
    /// Any real coordinates are accepted. With fewer than two points the
    /// point is always appended. Otherwise, in order:
    /// - near the first point: a copy of the first point is appended
    ///   (bit-identical closure) and a new polyline starts;
    /// - near the last point: nothing is appended and a new polyline starts;
    /// - else the point is appended.
    ///
    /// "Near" means `|dx| < tolerance` and `|dy| < tolerance`.
    pub fn add_point(&mut self, x: f64, y: f64) -> PointOutcome {
        let point = Vec2::new(x, y);
        let tolerance = self.tolerance;
        let current = self.bounds.current_mut();

        if current.len() < 2 {
            current.push(point);
            return PointOutcome::Appended;
        }

        let first = current.points()[0];
        let last = current.points()[current.len() - 1];

        if within_tolerance(&first, &point, tolerance) {
            current.push(first);
            debug!(points = current.len(), "Closed polyline onto its first point");
            self.bounds.start_new();
            PointOutcome::Closed
        } else if within_tolerance(&last, &point, tolerance) {
            debug!(points = current.len(), "Ended polyline at its last point");
            self.bounds.start_new();
            PointOutcome::Ended
        } else {
            current.push(point);
            PointOutcome::Appended
        }
    }

    /// Remove the most recently added point.
    ///
    /// Empty trailing polylines are discarded until a point can be popped,
    /// which reopens a closed or ended polyline for editing. With a single
    /// empty polyline left this is a no-op. Returns the removed point.
    pub fn undo_point(&mut self) -> Option<Vec2> {
        loop {
            if let Some(point) = self.bounds.current_mut().pop() {
                return Some(point);
            }
            if !self.bounds.reopen_previous() {
                return None;
            }
            debug!(
                polylines = self.bounds.len(),
                "Reopened previous polyline"
            );
        }
    }

    /// Segments `commit_and_clear` would emit, without clearing
    pub fn segments(&self) -> Vec<Segment> {
        let dims = self.dims;
        self.bounds
            .polylines()
            .flat_map(|polyline| polyline.segments(dims))
            .collect()
    }

    /// Drain every polyline into grid-space segments.
    ///
    /// Segments come out in polyline order, then point order; the engine
    /// applies them in sequence and later writes win on shared cells.
    /// Afterwards the editor holds a single empty polyline, so a second call
    /// returns nothing.
    pub fn commit_and_clear(&mut self) -> Vec<Segment> {
        let segments = self.segments();
        let polylines = self.bounds.len();
        self.bounds.clear();

        info!(
            polylines,
            segments = segments.len(),
            "Committed boundary polylines"
        );
        segments
    }
}
