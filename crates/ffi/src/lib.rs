//! C ABI for the grid setup library.
//!
//! Exposes a boundary editing session to a host that owns the engine
//! module. The host creates an instance with the engine's
//! `place_boundary_line` entry point as a callback, feeds pointer input
//! through [`editor`], attaches the grid to the engine's linear memory
//! through [`grid`], and reads back errors through [`error`].
//!
//! Every fallible entry point returns a [`GridSetupErrorCode`]; details of
//! the most recent failure on the calling thread are available from
//! [`grid_setup_get_last_error`].

pub mod editor;
pub mod error;
pub mod grid;
mod helpers;
pub mod instance;

pub use editor::{
    grid_setup_add_point, grid_setup_free_segments, grid_setup_pending_segments,
    grid_setup_place_boundaries, grid_setup_pop_segments, grid_setup_undo_point,
    GridSetupPointOutcome, GridSetupSegment, SegmentArray,
};
pub use error::{grid_setup_get_last_error, grid_setup_get_last_error_code, GridSetupErrorCode};
pub use grid::{
    grid_setup_attach, grid_setup_dims, grid_setup_field_ptr, grid_setup_is_attached,
    grid_setup_layout, grid_setup_set_value_at, grid_setup_value_at, GridSetupLayout,
};
pub use instance::{grid_setup_destroy, grid_setup_new, GridSetupInstance, PlaceBoundaryLineFn};
