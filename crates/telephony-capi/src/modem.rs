//! `telephony_modem_*` entry points

use std::ffi::c_char;
use std::os::raw::c_int;

use crate::types::telephony_h;
use crate::{check_out, guard, handle_ref, malloc_string, runtime};

/// IMEI of the modem. Release `imei` with `free()`.
#[no_mangle]
pub unsafe extern "C" fn telephony_modem_get_imei(
    handle: telephony_h,
    imei: *mut *mut c_char,
) -> c_int {
    guard("telephony_modem_get_imei", || {
        runtime::check_supported()?;
        // SAFETY: handle validity is the caller's contract.
        let telephony = unsafe { handle_ref(handle) }?;
        check_out(imei, "imei")?;

        let value = malloc_string(&telephony.imei()?)?;
        // SAFETY: checked non-null above.
        unsafe { *imei = value };
        Ok(())
    })
}
