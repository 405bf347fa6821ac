//! Grid attach to engine memory, end to end
//!
//! Builds the engine memory the way the module loader does (header element,
//! field, scratch, whole pages), attaches a grid that already holds data,
//! and checks that engine writes and grid writes meet in the same region.

use grid_setup_core::render::render_text;
use grid_setup_core::{
    BoundarySession, GridConfig, GridDims, GridError, LineBurner, LinearMemory, RegionLayout,
    SharedGrid,
};

#[test]
fn test_attach_preserves_written_cell() {
    let dims = GridDims::new(4, 2).unwrap();
    let mut grid = SharedGrid::new(dims);
    grid.set_value_at(0, 0, 1.0);

    let layout = RegionLayout::new(dims, 0);
    let memory = LinearMemory::for_layout(&layout);
    unsafe {
        grid.attach(memory.base(), memory.len(), layout.element_offset())
            .unwrap();
    }

    assert!(grid.is_attached());
    assert_eq!(grid.value_at(0, 0), 1.0);
    for row in 0..2 {
        for col in 0..4 {
            if (row, col) != (0, 0) {
                assert_eq!(grid.value_at(row, col), 0.0, "cell ({row}, {col})");
            }
        }
    }
    assert_eq!(grid.as_slice().len(), dims.cell_count());
}

#[test]
fn test_round_trip_before_and_after_attach() {
    let dims = GridDims::new(6, 3).unwrap();
    let mut grid = SharedGrid::new(dims);
    grid.set_value_at(2, 5, -7.25);
    assert_eq!(grid.value_at(2, 5), -7.25);

    let layout = RegionLayout::new(dims, 256);
    let memory = LinearMemory::for_layout(&layout);
    unsafe {
        grid.attach_bytes(memory.base_bytes(), memory.byte_len(), layout.element_offset())
            .unwrap();
    }

    assert_eq!(grid.value_at(2, 5), -7.25);
    grid.set_value_at(1, 4, f32::MIN_POSITIVE);
    assert_eq!(grid.value_at(1, 4), f32::MIN_POSITIVE);

    // Field sits right after the header element
    let offset = layout.element_offset();
    assert_eq!(memory.read(offset + dims.index(1, 4)), Some(f32::MIN_POSITIVE));
    assert_eq!(memory.read(offset + dims.index(2, 5)), Some(-7.25));
    assert_eq!(memory.read(0), Some(0.0));
}

#[test]
fn test_undersized_region_is_rejected() {
    let dims = GridDims::new(4, 4).unwrap();
    let mut grid = SharedGrid::new(dims);
    let memory = LinearMemory::with_len(16);

    let result = unsafe { grid.attach(memory.base(), memory.len(), 1) };
    assert_eq!(
        result,
        Err(GridError::RegionTooSmall {
            required: 17,
            available: 16
        })
    );
    assert!(!grid.is_attached());
}

#[test]
fn test_session_places_square_into_engine_memory() {
    let config = GridConfig {
        width: 8,
        height: 8,
        ..Default::default()
    };
    let layout = config.layout().unwrap();
    let memory = LinearMemory::for_layout(&layout);
    let burner = unsafe { LineBurner::new(memory.base(), memory.len(), &layout) };

    let mut session = BoundarySession::new(&config, burner).unwrap();
    unsafe {
        session
            .attach(memory.base(), memory.len(), layout.element_offset())
            .unwrap();
    }

    // Square from cell (1,1) to (6,6), closed on the first point
    session.add_point(0.125, 0.125);
    session.add_point(0.75, 0.125);
    session.add_point(0.75, 0.75);
    session.add_point(0.125, 0.75);
    session.add_point(0.125, 0.125);
    assert_eq!(session.place_boundaries(), 4);

    let lines = render_text(session.grid(), session.editor());
    assert_eq!(
        lines,
        vec![
            "........",
            ".######.",
            ".#....#.",
            ".#....#.",
            ".#....#.",
            ".#....#.",
            ".######.",
            "........",
        ]
    );
}
