//! Pointer input and commit entry points.
//!
//! Primary-button presses map to [`grid_setup_add_point`], secondary-button
//! presses to [`grid_setup_undo_point`], and the "place boundaries" action to
//! [`grid_setup_place_boundaries`].

use grid_setup_core::{PointOutcome, Segment};
use std::ptr;

use crate::error::GridSetupErrorCode;
use crate::helpers::{instance_mut, instance_ref};
use crate::instance::GridSetupInstance;

/// What a call to `grid_setup_add_point` did.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSetupPointOutcome {
    /// Point appended to the current polyline.
    Appended = 0,
    /// Point snapped to the start; the polyline was closed and a new one begun.
    Closed = 1,
    /// Point snapped to the end; the polyline was finished open.
    Ended = 2,
}

impl From<PointOutcome> for GridSetupPointOutcome {
    fn from(outcome: PointOutcome) -> Self {
        match outcome {
            PointOutcome::Appended => Self::Appended,
            PointOutcome::Closed => Self::Closed,
            PointOutcome::Ended => Self::Ended,
        }
    }
}

/// C-compatible grid-space segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSetupSegment {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl From<Segment> for GridSetupSegment {
    fn from(segment: Segment) -> Self {
        Self {
            x0: segment.x0,
            y0: segment.y0,
            x1: segment.x1,
            y1: segment.y1,
        }
    }
}

/// Owned array of segments.
///
/// Free with `grid_setup_free_segments`.
#[repr(C)]
pub struct SegmentArray {
    /// Array of segments in commit order
    pub segments: *mut GridSetupSegment,
    /// Number of segments
    pub count: usize,
}

fn into_segment_array(segments: Vec<Segment>) -> *mut SegmentArray {
    let segments: Box<[GridSetupSegment]> =
        segments.into_iter().map(GridSetupSegment::from).collect();
    let count = segments.len();
    let segments = Box::into_raw(segments).cast::<GridSetupSegment>();

    Box::into_raw(Box::new(SegmentArray { segments, count }))
}

/// Feed one primary-button press at normalized coordinates.
///
/// # Parameters
/// - `x`, `y`: Position in `[0, 1]`, origin top-left
/// - `out_outcome`: Receives what the press did. May be null.
///
/// # Returns
/// - `GridSetupErrorCode::Ok` (0) on success
/// - `GridSetupErrorCode::NullPointer` if `instance` is null
///
/// # Safety
/// `instance` must come from `grid_setup_new`; `out_outcome` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_add_point(
    instance: *mut GridSetupInstance,
    x: f64,
    y: f64,
    out_outcome: *mut GridSetupPointOutcome,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let outcome = instance.session.add_point(x, y);
    if !out_outcome.is_null() {
        unsafe {
            *out_outcome = outcome.into();
        }
    }
    GridSetupErrorCode::Ok
}

/// Feed one secondary-button press: remove the most recent point.
///
/// Walks back into the previous polyline when the current one is empty.
///
/// # Parameters
/// - `out_removed`: Receives whether a point was removed. May be null.
///
/// # Safety
/// `instance` must come from `grid_setup_new`; `out_removed` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_undo_point(
    instance: *mut GridSetupInstance,
    out_removed: *mut bool,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let removed = instance.session.undo_point().is_some();
    if !out_removed.is_null() {
        unsafe {
            *out_removed = removed;
        }
    }
    GridSetupErrorCode::Ok
}

/// Drain all polylines and send every segment to the engine callback.
///
/// Segments are sent in commit order as
/// `callback(user_data, x0, y0, x1, y1, width)`. The editor is empty afterwards.
///
/// # Parameters
/// - `out_count`: Receives the number of segments placed. May be null.
///
/// # Safety
/// `instance` must come from `grid_setup_new`; `out_count` must be null or writable.
/// The engine callback runs on this thread before the function returns.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_place_boundaries(
    instance: *mut GridSetupInstance,
    out_count: *mut usize,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let count = instance.session.place_boundaries();
    if !out_count.is_null() {
        unsafe {
            *out_count = count;
        }
    }
    GridSetupErrorCode::Ok
}

/// Segments the next placement would send, without draining the editor.
///
/// # Returns
/// Pointer to a `SegmentArray`, or null if `instance` is null.
/// Caller must call `grid_setup_free_segments` to free memory.
///
/// # Safety
/// `instance` must come from `grid_setup_new`.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_pending_segments(
    instance: *const GridSetupInstance,
) -> *mut SegmentArray {
    unsafe { instance_ref(instance) }.map_or(ptr::null_mut(), |instance| {
        into_segment_array(instance.session.pending_segments())
    })
}

/// Drain all polylines into segments without calling the engine.
///
/// For hosts that forward segments themselves.
///
/// # Returns
/// Pointer to a `SegmentArray`, or null if `instance` is null.
/// Caller must call `grid_setup_free_segments` to free memory.
///
/// # Safety
/// `instance` must come from `grid_setup_new`.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_pop_segments(
    instance: *mut GridSetupInstance,
) -> *mut SegmentArray {
    unsafe { instance_mut(instance) }.map_or(ptr::null_mut(), |instance| {
        into_segment_array(instance.session.take_segments())
    })
}

/// Frees an array returned by `grid_setup_pending_segments` or
/// `grid_setup_pop_segments`.
///
/// # Safety
/// `data` must be null or come from one of those functions, and not be freed yet.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_free_segments(data: *mut SegmentArray) {
    if data.is_null() {
        return;
    }

    unsafe {
        let data = Box::from_raw(data);
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            data.segments,
            data.count,
        )));
    }
}
