use grid_setup_core::{BoundaryEngine, BoundarySession, GridConfig};
use std::ffi::c_void;
use std::ptr;

use crate::error::{DefaultGridSetupError, GridSetupErrorCode};
use crate::helpers::{track_error, track_result};

/// Engine entry point that burns one segment into the shared field.
///
/// Called as `callback(user_data, x0, y0, x1, y1, width)` with grid-space
/// coordinates and the field's row stride. Must return only after the write
/// is complete.
pub type PlaceBoundaryLineFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    width: i32,
);

/// Engine backed by a host-provided function pointer.
#[derive(Debug)]
pub(crate) struct CallbackEngine {
    callback: PlaceBoundaryLineFn,
    user_data: *mut c_void,
}

impl BoundaryEngine for CallbackEngine {
    fn place_boundary_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32) {
        // SAFETY: `grid_setup_new` requires the callback to be callable with
        // `user_data` for the whole life of the instance.
        unsafe { (self.callback)(self.user_data, x0, y0, x1, y1, width) };
    }
}

/// A boundary editing session behind an opaque handle.
///
/// Holds the polyline editor, the grid (detached until
/// `grid_setup_attach`), and the engine callback.
///
/// # Thread Safety
/// Not thread-safe. Once attached the grid aliases engine memory that the
/// engine writes synchronously, so an instance must only be used from the
/// thread that owns the engine module.
///
/// ## Host Example
/// ```cpp
/// GridSetupInstance* grid = nullptr;
/// if (grid_setup_new(160, 160, place_boundary_line, module, &grid) != GridSetupErrorCode::Ok) {
///     return;
/// }
///
/// // After the engine module is instantiated
/// grid_setup_attach(grid, module_memory, module_memory_len, 1);
///
/// // Pointer input
/// grid_setup_add_point(grid, 0.25, 0.25, nullptr);
/// grid_setup_add_point(grid, 0.75, 0.25, nullptr);
///
/// size_t placed = 0;
/// grid_setup_place_boundaries(grid, &placed);
///
/// grid_setup_destroy(grid);
/// ```
pub struct GridSetupInstance {
    pub(crate) session: BoundarySession<CallbackEngine>,
}

impl GridSetupInstance {
    /// Creates a new instance with a detached grid.
    ///
    /// # Errors
    ///
    /// Returns `GridSetupErrorCode::InvalidDimensions` if width or height is zero
    /// or the cell count overflows.
    pub(crate) fn new(
        config: &GridConfig,
        engine: CallbackEngine,
    ) -> Result<Self, DefaultGridSetupError> {
        let session = BoundarySession::new(config, engine)?;
        Ok(Self { session })
    }
}

/// Create a new instance and return it via out-parameter.
///
/// Parameters
/// - `width`, `height`: Grid size in cells. Both must be positive.
/// - `callback`: The engine's `place_boundary_line` entry point. Must be non-null.
/// - `user_data`: Passed back unchanged as the first callback argument. May be null.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///   - On success: set to valid `GridSetupInstance` pointer
///   - On failure: set to null
///
/// Returns
/// - `GridSetupErrorCode::Ok` (0): success, `out_instance` contains valid pointer
/// - `GridSetupErrorCode::NullPointer`: `callback` or `out_instance` is null
/// - `GridSetupErrorCode::InvalidDimensions`: width or height is zero
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `callback` must stay callable with `user_data` until the instance is destroyed.
/// - The caller takes ownership of the returned instance and MUST call
///   `grid_setup_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_new(
    width: usize,
    height: usize,
    callback: Option<PlaceBoundaryLineFn>,
    user_data: *mut c_void,
    out_instance: *mut *mut GridSetupInstance,
) -> GridSetupErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultGridSetupError::null_pointer("out_instance"));
    }

    let Some(callback) = callback else {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultGridSetupError::null_pointer("callback"));
    };

    let config = GridConfig {
        width,
        height,
        ..Default::default()
    };
    let engine = CallbackEngine {
        callback,
        user_data,
    };

    match track_result(GridSetupInstance::new(&config, engine)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(Box::new(instance));
            }
            GridSetupErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `grid_setup_new`.
///
/// If `ptr` is null, this function is a no-op. Engine memory the grid was
/// attached to is not touched; the host still owns it.
///
/// # Safety
/// - The pointer MUST have been created by `grid_setup_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn grid_setup_destroy(ptr: *mut GridSetupInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer came from `Box::into_raw` in `grid_setup_new` and has
    // not been freed. `Box::from_raw` reclaims ownership and drops it.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::grid_setup_get_last_error_code;

    /// Callback that appends `[x0, y0, x1, y1, width]` to a `Vec` behind `user_data`
    pub(crate) unsafe extern "C" fn record_call(
        user_data: *mut c_void,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: i32,
    ) {
        let calls = unsafe { &mut *user_data.cast::<Vec<[i32; 5]>>() };
        calls.push([x0, y0, x1, y1, width]);
    }

    /// Create an instance that records into `calls`
    pub(crate) fn recording_instance(
        width: usize,
        height: usize,
        calls: &mut Vec<[i32; 5]>,
    ) -> *mut GridSetupInstance {
        let mut instance = ptr::null_mut();
        let code = unsafe {
            grid_setup_new(
                width,
                height,
                Some(record_call),
                ptr::from_mut(calls).cast::<c_void>(),
                &mut instance,
            )
        };
        assert_eq!(code, GridSetupErrorCode::Ok);
        assert!(!instance.is_null());
        instance
    }

    #[test]
    fn test_new_and_destroy() {
        let mut calls = Vec::new();
        let instance = recording_instance(160, 160, &mut calls);
        assert_eq!(grid_setup_get_last_error_code(), GridSetupErrorCode::Ok);
        unsafe { grid_setup_destroy(instance) };
        unsafe { grid_setup_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_zero_width_sets_null_and_error() {
        let mut calls: Vec<[i32; 5]> = Vec::new();
        let mut instance = ptr::NonNull::dangling().as_ptr();
        let code = unsafe {
            grid_setup_new(
                0,
                10,
                Some(record_call),
                ptr::from_mut(&mut calls).cast::<c_void>(),
                &mut instance,
            )
        };
        assert_eq!(code, GridSetupErrorCode::InvalidDimensions);
        assert!(instance.is_null());
        assert_eq!(
            grid_setup_get_last_error_code(),
            GridSetupErrorCode::InvalidDimensions
        );
    }

    #[test]
    fn test_missing_callback_is_rejected() {
        let mut instance = ptr::null_mut();
        let code = unsafe { grid_setup_new(4, 4, None, ptr::null_mut(), &mut instance) };
        assert_eq!(code, GridSetupErrorCode::NullPointer);
        assert!(instance.is_null());

        let code = unsafe {
            grid_setup_new(4, 4, Some(record_call), ptr::null_mut(), ptr::null_mut())
        };
        assert_eq!(code, GridSetupErrorCode::NullPointer);
    }
}
