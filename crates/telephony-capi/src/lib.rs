//! # Telephony C API
//!
//! Exposes the telephony information API as `telephony_*` C symbols (see
//! `include/telephony.h`). Every entry point follows the same sequence:
//!
//! 1. feature gate (`TELEPHONY_ERROR_NOT_SUPPORTED`),
//! 2. null handle / output checks (`TELEPHONY_ERROR_INVALID_PARAMETER`),
//! 3. one call into `telephony-core`,
//! 4. the result is written to the output location only on success.
//!
//! Strings are returned in `malloc`ed buffers that the caller releases with
//! `free()`. A `telephony_h` is a boxed `Arc<TelephonyHandle>`; it stays
//! valid until `telephony_deinit`.

use std::ffi::{c_char, CString};
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error};

use telephony_core::error::status_code;
use telephony_core::{TelephonyError, TelephonyHandle};

pub mod call;
pub mod common;
pub mod modem;
pub mod network;
pub mod runtime;
pub mod types;

pub use call::*;
pub use common::*;
pub use modem::*;
pub use network::*;
pub use runtime::{install, reset};
pub use types::*;

/// Run the body of an entry point and turn its outcome, panics included,
/// into a C status.
fn guard<F>(entry: &str, body: F) -> c_int
where
    F: FnOnce() -> Result<(), TelephonyError>,
{
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => {
            if let Err(e) = &result {
                debug!("{} -> {}", entry, e.name());
            }
            status_code(&result)
        }
        Err(_) => {
            error!("{} panicked", entry);
            TELEPHONY_ERROR_OPERATION_FAILED
        }
    }
}

/// Box a handle for C.
fn into_raw_handle(handle: Arc<TelephonyHandle>) -> telephony_h {
    Box::into_raw(Box::new(handle)).cast()
}

/// Borrow the handle behind `handle`.
///
/// # Safety
/// `handle` must be null or a pointer produced by `telephony_init` that has
/// not been passed to `telephony_deinit`.
unsafe fn handle_ref<'a>(handle: telephony_h) -> Result<&'a TelephonyHandle, TelephonyError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { handle.cast::<Arc<TelephonyHandle>>().as_ref() } {
        Some(handle) => Ok(handle.as_ref()),
        None => {
            error!("INVALID_PARAMETER: handle is NULL");
            Err(TelephonyError::invalid_parameter("handle"))
        }
    }
}

/// Reject a null output location.
fn check_out<T>(out: *mut T, what: &str) -> Result<(), TelephonyError> {
    if out.is_null() {
        error!("INVALID_PARAMETER: {} is NULL", what);
        return Err(TelephonyError::invalid_parameter(what));
    }
    Ok(())
}

/// Copy `value` into a new `malloc`ed, NUL-terminated buffer. A value with
/// an interior NUL cannot be represented and fails.
fn malloc_string(value: &str) -> Result<*mut c_char, TelephonyError> {
    let value = CString::new(value).map_err(|e| {
        error!("OPERATION_FAILED: NUL at byte {} of daemon string", e.nul_position());
        TelephonyError::operation_failed("string contains NUL")
    })?;
    let bytes = value.as_bytes_with_nul();
    // SAFETY: a fresh allocation of `bytes.len()` bytes is written in bounds only.
    unsafe {
        let buf = libc::malloc(bytes.len()).cast::<u8>();
        if buf.is_null() {
            error!("OUT_OF_MEMORY");
            return Err(TelephonyError::OutOfMemory);
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
        Ok(buf.cast())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn malloc_string_copies_with_terminator() {
        let raw = malloc_string("SKTelecom").unwrap();
        let copied = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_string();
        unsafe { libc::free(raw.cast()) };
        assert_eq!(copied, "SKTelecom");
    }

    #[test]
    fn malloc_string_rejects_interior_nul() {
        assert!(matches!(
            malloc_string("SK\0Telecom"),
            Err(TelephonyError::OperationFailed { .. })
        ));
    }
}
