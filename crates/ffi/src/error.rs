use grid_setup_core::GridError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
///
/// # Example
/// ```rust,ignore
/// let err = DefaultGridSetupError::null_pointer("instance");
/// assert_eq!(err.code(), GridSetupErrorCode::NullPointer);
/// assert_eq!(err.msg(), "Parameter 'instance' cannot be null");
/// ```
pub(crate) trait GridSetupError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> GridSetupErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `GridSetupError` for the FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultGridSetupError {
    code: GridSetupErrorCode,
    msg: String,
}

impl DefaultGridSetupError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"region"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: GridSetupErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a cell query outside the grid.
    pub fn out_of_bounds(row: usize, col: usize, width: usize, height: usize) -> Self {
        Self {
            code: GridSetupErrorCode::OutOfBounds,
            msg: format!("Cell ({row}, {col}) is outside the {width}x{height} grid"),
        }
    }
}

impl From<GridError> for DefaultGridSetupError {
    fn from(error: GridError) -> Self {
        let code = match error {
            GridError::InvalidDimensions { .. } => GridSetupErrorCode::InvalidDimensions,
            GridError::RegionTooSmall { .. } => GridSetupErrorCode::RegionTooSmall,
            GridError::MisalignedRegion => GridSetupErrorCode::MisalignedRegion,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl GridSetupError for DefaultGridSetupError {
    fn code(&self) -> GridSetupErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by grid setup functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSetupErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Width or height is zero, or the cell count overflows.
    InvalidDimensions = 2,

    /// External region cannot hold the header and the field.
    RegionTooSmall = 3,

    /// External region is not aligned for `f32` access.
    MisalignedRegion = 4,

    /// Row or column outside the grid.
    OutOfBounds = 5,
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, GridSetupErrorCode)> = const { RefCell::new((None, GridSetupErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, GridSetupErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, GridSetupErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread
/// that sets or clears the error.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// GridSetupInstance* grid = nullptr;
/// GridSetupErrorCode err = grid_setup_new(160, 160, place_boundary_line, module, &grid);
/// if (err != GridSetupErrorCode::Ok) {
///     const char* error = grid_setup_get_last_error();
///     if (error) {
///         printf("Grid setup failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn grid_setup_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `GridSetupErrorCode::Ok` (0) if the last call on this thread
/// succeeded, otherwise the code of the failed call.
#[no_mangle]
pub extern "C" fn grid_setup_get_last_error_code() -> GridSetupErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
