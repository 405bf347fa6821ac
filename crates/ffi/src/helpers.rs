use crate::error::{
    with_last_error_mut, DefaultGridSetupError, GridSetupError, GridSetupErrorCode,
};
use crate::instance::GridSetupInstance;
use std::ffi::CString;
use tracing::debug;

/// Set the thread-local error message and code.
/// Accepts any type implementing `GridSetupError` trait.
pub(crate) fn set_last_error(error: &impl GridSetupError) {
    debug!(code = ?error.code(), "{}", error.msg());
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl GridSetupError) -> GridSetupErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a fallible operation.
/// Errors are stored for `grid_setup_get_last_error`; success clears the slot.
pub(crate) fn track_result<T, E: GridSetupError>(
    result: Result<T, E>,
) -> Result<T, GridSetupErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = GridSetupErrorCode::Ok;
    });
}

/// Borrow an instance from a raw handle, recording a null handle as an error.
///
/// A successful borrow clears the last error; later failures in the same
/// call record their own.
///
/// # Safety
/// A non-null `ptr` must come from `grid_setup_new` and not be destroyed,
/// and no other reference to the instance may be live for `'a`.
pub(crate) unsafe fn instance_mut<'a>(
    ptr: *mut GridSetupInstance,
) -> Result<&'a mut GridSetupInstance, GridSetupErrorCode> {
    // SAFETY: forwarded caller contract
    let instance = unsafe { ptr.as_mut() }
        .ok_or_else(|| track_error(&DefaultGridSetupError::null_pointer("instance")))?;
    clear_last_error();
    Ok(instance)
}

/// Shared-borrow variant of [`instance_mut`].
///
/// # Safety
/// A non-null `ptr` must come from `grid_setup_new` and not be destroyed.
pub(crate) unsafe fn instance_ref<'a>(
    ptr: *const GridSetupInstance,
) -> Result<&'a GridSetupInstance, GridSetupErrorCode> {
    // SAFETY: forwarded caller contract
    let instance = unsafe { ptr.as_ref() }
        .ok_or_else(|| track_error(&DefaultGridSetupError::null_pointer("instance")))?;
    clear_last_error();
    Ok(instance)
}
