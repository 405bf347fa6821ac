//! Grid Setup Core Library
//!
//! Boundary editing for a 2D scalar grid that is shared with a separately
//! compiled simulation engine. A user draws open or closed polylines in
//! normalized coordinates; on commit the polylines are rasterized into
//! grid-space segments and handed to the engine, which burns them into the
//! shared field as boundary cells.
//!
//! ## Components
//!
//! - [`BoundaryEditor`]: polyline editing state machine (append with
//!   closing/ending snap, undo walk-back, drain into segments)
//! - [`SharedGrid`]: fixed-size `f32` field that starts out owned and is later
//!   re-backed by externally owned memory without losing its contents
//! - [`BoundaryEngine`]: the single capability the external engine exposes
//! - [`BoundarySession`]: wires the three together for commit-time forwarding

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod grid;
pub mod render;
pub mod session;

// Re-export core types
pub use core_types::{CellRect, GridDims, Segment, Vec2};

pub use config::GridConfig;
pub use editor::{BoundaryEditor, BoundarySet, PointOutcome, Polyline, SNAP_TOLERANCE};
pub use engine::{BoundaryEngine, LineBurner, RecordingEngine};
pub use error::GridError;
pub use grid::{LinearMemory, RegionLayout, SharedGrid};
pub use session::BoundarySession;
