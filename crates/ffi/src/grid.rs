//! Grid queries and the switch to engine-owned memory.

use grid_setup_core::{GridDims, RegionLayout};
use std::ptr::{self, NonNull};

use crate::error::{DefaultGridSetupError, GridSetupErrorCode};
use crate::helpers::{instance_mut, instance_ref, track_error, track_result};
use crate::instance::GridSetupInstance;

/// Sizing of the engine's linear memory for a given grid.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSetupLayout {
    /// Element index of the first field value
    pub element_offset: usize,
    /// Bytes for header, field and scratch space
    pub required_bytes: usize,
    /// Whole 64 KiB pages to request from the module loader
    pub required_pages: usize,
}

impl From<&RegionLayout> for GridSetupLayout {
    fn from(layout: &RegionLayout) -> Self {
        Self {
            element_offset: layout.element_offset(),
            required_bytes: layout.required_bytes(),
            required_pages: layout.required_pages(),
        }
    }
}

/// Compute how much engine memory a `width` x `height` grid needs.
///
/// # Parameters
/// - `aux_bytes`: Scratch bytes the engine module needs after the field
/// - `out_layout`: Receives the layout. Must be non-null.
///
/// # Returns
/// - `GridSetupErrorCode::Ok` (0) on success
/// - `GridSetupErrorCode::NullPointer` if `out_layout` is null
/// - `GridSetupErrorCode::InvalidDimensions` if width or height is zero
///
/// # Safety
/// `out_layout` must be a valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_layout(
    width: usize,
    height: usize,
    aux_bytes: usize,
    out_layout: *mut GridSetupLayout,
) -> GridSetupErrorCode {
    if out_layout.is_null() {
        return track_error(&DefaultGridSetupError::null_pointer("out_layout"));
    }

    let dims = match track_result(GridDims::new(width, height).map_err(DefaultGridSetupError::from))
    {
        Ok(dims) => dims,
        Err(code) => return code,
    };

    unsafe {
        *out_layout = GridSetupLayout::from(&RegionLayout::new(dims, aux_bytes));
    }
    GridSetupErrorCode::Ok
}

/// Re-back the grid with engine memory.
///
/// The grid's current values are copied to
/// `region[element_offset..element_offset + width * height]`; from then on
/// reads and writes go straight to that region, and cells the engine burns
/// are visible without copying. May be called again to move to a new region.
///
/// # Returns
/// - `GridSetupErrorCode::Ok` (0) on success
/// - `GridSetupErrorCode::NullPointer` if `instance` or `region` is null
/// - `GridSetupErrorCode::RegionTooSmall` if the field does not fit; the grid is unchanged
///
/// # Safety
/// - `region` must be valid for reads and writes of `region_len` `f32` values.
/// - The region must outlive the instance, or the instance must be attached
///   elsewhere before the region is freed.
/// - Nothing but the engine may write the field while the instance is in use.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_attach(
    instance: *mut GridSetupInstance,
    region: *mut f32,
    region_len: usize,
    element_offset: usize,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };
    let Some(region) = NonNull::new(region) else {
        return track_error(&DefaultGridSetupError::null_pointer("region"));
    };

    // SAFETY: forwarded caller contract
    let result = unsafe {
        instance
            .session
            .attach(region, region_len, element_offset)
    };
    match track_result(result.map_err(DefaultGridSetupError::from)) {
        Ok(()) => GridSetupErrorCode::Ok,
        Err(code) => code,
    }
}

/// Whether the grid is backed by engine memory.
///
/// Returns false for a null instance.
///
/// # Safety
/// `instance` must be null or come from `grid_setup_new`.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_is_attached(instance: *const GridSetupInstance) -> bool {
    unsafe { instance_ref(instance) }.is_ok_and(|instance| instance.session.grid().is_attached())
}

/// Read cell `(row, col)`.
///
/// # Returns
/// - `GridSetupErrorCode::Ok` (0) on success, with `out_value` set
/// - `GridSetupErrorCode::NullPointer` if `instance` or `out_value` is null
/// - `GridSetupErrorCode::OutOfBounds` if the cell is outside the grid
///
/// # Safety
/// `instance` must come from `grid_setup_new`; `out_value` must be writable.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_value_at(
    instance: *const GridSetupInstance,
    row: usize,
    col: usize,
    out_value: *mut f32,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_ref(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };
    if out_value.is_null() {
        return track_error(&DefaultGridSetupError::null_pointer("out_value"));
    }

    let grid = instance.session.grid();
    let Some(value) = grid.get(row, col) else {
        return track_error(&DefaultGridSetupError::out_of_bounds(
            row,
            col,
            grid.width(),
            grid.height(),
        ));
    };

    unsafe {
        *out_value = value;
    }
    GridSetupErrorCode::Ok
}

/// Write cell `(row, col)`.
///
/// # Returns
/// - `GridSetupErrorCode::Ok` (0) on success
/// - `GridSetupErrorCode::NullPointer` if `instance` is null
/// - `GridSetupErrorCode::OutOfBounds` if the cell is outside the grid
///
/// # Safety
/// `instance` must come from `grid_setup_new`.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_set_value_at(
    instance: *mut GridSetupInstance,
    row: usize,
    col: usize,
    value: f32,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let grid = instance.session.grid_mut();
    if grid.dims().checked_index(row, col).is_none() {
        return track_error(&DefaultGridSetupError::out_of_bounds(
            row,
            col,
            grid.width(),
            grid.height(),
        ));
    }
    grid.set_value_at(row, col, value);
    GridSetupErrorCode::Ok
}

/// Pointer to the first field value, row-major.
///
/// Points into engine memory once attached. Invalidated by the next
/// `grid_setup_attach` or `grid_setup_destroy`. Null for a null instance.
///
/// # Safety
/// `instance` must be null or come from `grid_setup_new`.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_field_ptr(instance: *const GridSetupInstance) -> *const f32 {
    unsafe { instance_ref(instance) }
        .map_or(ptr::null(), |instance| instance.session.grid().field_ptr())
}

/// Grid width and height in cells.
///
/// # Safety
/// `instance` must come from `grid_setup_new`; both out pointers must be writable.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_dims(
    instance: *const GridSetupInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> GridSetupErrorCode {
    let instance = match unsafe { instance_ref(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };
    if out_width.is_null() || out_height.is_null() {
        return track_error(&DefaultGridSetupError::null_pointer("out_width/out_height"));
    }

    let grid = instance.session.grid();
    unsafe {
        *out_width = grid.width();
        *out_height = grid.height();
    }
    GridSetupErrorCode::Ok
}
