//! Editing session: editor, grid and engine wired together.
//!
//! This is the commit-time caller. Pointer input goes to the editor; on
//! "place boundaries" the editor is drained and every segment is forwarded,
//! in order, to the injected engine together with the grid's row stride.

use crate::config::GridConfig;
use crate::core_types::{GridDims, Segment, Vec2};
use crate::editor::{BoundaryEditor, PointOutcome};
use crate::engine::BoundaryEngine;
use crate::error::GridError;
use crate::grid::SharedGrid;
use std::ptr::NonNull;
use tracing::info;

/// Boundary editing over one shared grid.
#[derive(Debug)]
pub struct BoundarySession<E: BoundaryEngine> {
    editor: BoundaryEditor,
    grid: SharedGrid,
    engine: E,
}

impl<E: BoundaryEngine> BoundarySession<E> {
    /// Build a detached grid and an empty editor from `config`.
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` for a zero-sized grid.
    pub fn new(config: &GridConfig, engine: E) -> Result<Self, GridError> {
        let dims = config.dims()?;
        Ok(Self::with_dims(dims, config.snap_tolerance, engine))
    }

    /// Build from already validated dimensions
    pub fn with_dims(dims: GridDims, snap_tolerance: f64, engine: E) -> Self {
        info!(
            width = dims.width(),
            height = dims.height(),
            snap_tolerance,
            "Creating boundary session"
        );
        Self {
            editor: BoundaryEditor::with_tolerance(dims, snap_tolerance),
            grid: SharedGrid::new(dims),
            engine,
        }
    }

    pub fn editor(&self) -> &BoundaryEditor {
        &self.editor
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut SharedGrid {
        &mut self.grid
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Primary-button input at normalized coordinates
    pub fn add_point(&mut self, x: f64, y: f64) -> PointOutcome {
        self.editor.add_point(x, y)
    }

    /// Secondary-button input
    pub fn undo_point(&mut self) -> Option<Vec2> {
        self.editor.undo_point()
    }

    /// Segments that the next placement would send
    pub fn pending_segments(&self) -> Vec<Segment> {
        self.editor.segments()
    }

    /// Drain the editor into the engine.
    ///
    /// Each segment is sent as `place_boundary_line(x0, y0, x1, y1, width)`
    /// in commit order. Returns the number of segments placed.
    pub fn place_boundaries(&mut self) -> usize {
        let segments = self.editor.commit_and_clear();
        let width = self.grid.width() as i32;
        for segment in &segments {
            self.engine
                .place_boundary_line(segment.x0, segment.y0, segment.x1, segment.y1, width);
        }

        info!(segments = segments.len(), width, "Placed boundaries");
        segments.len()
    }

    /// Drain the editor without calling the engine
    pub fn take_segments(&mut self) -> Vec<Segment> {
        self.editor.commit_and_clear()
    }

    /// Attach the grid to the engine's memory.
    ///
    /// # Errors
    /// See [`SharedGrid::attach`].
    ///
    /// # Safety
    /// See [`SharedGrid::attach`]. The region must also outlive this session.
    pub unsafe fn attach(
        &mut self,
        region: NonNull<f32>,
        region_len: usize,
        element_offset: usize,
    ) -> Result<(), GridError> {
        // SAFETY: forwarded caller contract
        unsafe { self.grid.attach(region, region_len, element_offset) }
    }

    /// Take the engine back, dropping editor and grid
    pub fn into_engine(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LineBurner, RecordingEngine};
    use crate::grid::{LinearMemory, RegionLayout};

    fn session() -> BoundarySession<RecordingEngine> {
        let config = GridConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        BoundarySession::new(&config, RecordingEngine::new()).unwrap()
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GridConfig {
            width: 0,
            ..Default::default()
        };
        assert!(BoundarySession::new(&config, RecordingEngine::new()).is_err());
    }

    #[test]
    fn test_place_forwards_in_order_with_stride() {
        let mut session = session();
        session.add_point(0.0, 0.0);
        session.add_point(0.5, 0.0);
        session.add_point(1.0, 1.0);

        assert_eq!(session.pending_segments().len(), 2);
        assert_eq!(session.place_boundaries(), 2);
        assert_eq!(
            session.engine().calls(),
            &[
                (Segment::new(0, 0, 5, 0), 10),
                (Segment::new(5, 0, 10, 10), 10)
            ]
        );
        assert!(session.editor().is_empty());

        assert_eq!(session.place_boundaries(), 0);
        assert_eq!(session.engine().calls().len(), 2);
    }

    #[test]
    fn test_take_segments_skips_engine() {
        let mut session = session();
        session.add_point(0.1, 0.1);
        session.add_point(0.3, 0.1);
        assert_eq!(session.take_segments(), vec![Segment::new(1, 1, 3, 1)]);
        assert!(session.editor().is_empty());
        assert!(session.engine().calls().is_empty());
    }

    #[test]
    fn test_undo_forwards() {
        let mut session = session();
        session.add_point(0.2, 0.2);
        assert_eq!(session.undo_point(), Some(Vec2::new(0.2, 0.2)));
        assert_eq!(session.undo_point(), None);
    }

    #[test]
    fn test_burned_cells_visible_through_attached_grid() {
        let dims = GridDims::new(8, 8).unwrap();
        let layout = RegionLayout::new(dims, 0);
        let memory = LinearMemory::for_layout(&layout);
        let burner = unsafe { LineBurner::new(memory.base(), memory.len(), &layout) };

        let mut session = BoundarySession::with_dims(dims, 0.01, burner);
        session.grid_mut().set_value_at(7, 7, 0.5);
        unsafe {
            session
                .attach(memory.base(), memory.len(), layout.element_offset())
                .unwrap();
        };

        // Horizontal line across row 2
        session.add_point(0.0, 0.25);
        session.add_point(0.5, 0.25);
        assert_eq!(session.place_boundaries(), 1);

        let grid = session.grid();
        for col in 0..=4 {
            assert_eq!(grid.value_at(2, col), 1.0, "col {col}");
        }
        assert_eq!(grid.value_at(2, 5), 0.0);
        assert_eq!(grid.value_at(7, 7), 0.5, "seeded value survives");
        assert_eq!(session.engine().cells_burned(), 5);
    }
}
