//! Polylines and the ordered set the editor works on.

use crate::core_types::{GridDims, Segment, Vec2};

/// Ordered points in normalized coordinates.
///
/// Insertion order is drawing order: segment `i` joins points `i` and `i+1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Vec2>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Vec2> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Vec2> {
        self.points.last()
    }

    /// Closed loops end on an exact copy of their first point
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    pub(crate) fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub(crate) fn pop(&mut self) -> Option<Vec2> {
        self.points.pop()
    }

    /// Grid-space segments between consecutive points
    pub fn segments(&self, dims: GridDims) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(move |pair| Segment::from_points(&pair[0], &pair[1], dims))
    }
}

/// Ordered polylines; the trailing one is the *current* polyline.
///
/// Never empty: a fresh set holds a single empty current polyline. Only the
/// current polyline is ever modified; finished ones come back only when undo
/// walks into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    finished: Vec<Polyline>,
    current: Polyline,
}

impl BoundarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The polyline being drawn
    pub fn current(&self) -> &Polyline {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut Polyline {
        &mut self.current
    }

    /// All polylines in drawing order, current one last
    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.finished.iter().chain(std::iter::once(&self.current))
    }

    /// Number of polylines, including the current one (always >= 1)
    pub fn len(&self) -> usize {
        self.finished.len() + 1
    }

    /// True when the set holds nothing but an empty current polyline
    pub fn is_empty(&self) -> bool {
        self.finished.is_empty() && self.current.is_empty()
    }

    /// Total points across all polylines
    pub fn point_count(&self) -> usize {
        self.polylines().map(Polyline::len).sum()
    }

    /// Finish the current polyline and start an empty one
    pub(crate) fn start_new(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.finished.push(finished);
    }

    /// Drop the current polyline and make the previous one current again.
    ///
    /// Returns `false`, leaving the set untouched, when there is no previous
    /// polyline.
    pub(crate) fn reopen_previous(&mut self) -> bool {
        let Some(previous) = self.finished.pop() else {
            return false;
        };
        self.current = previous;
        true
    }

    /// Reset to a single empty polyline
    pub(crate) fn clear(&mut self) {
        self.finished.clear();
        self.current = Polyline::new();
    }
}
