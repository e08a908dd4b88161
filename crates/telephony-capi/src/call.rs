//! `telephony_call_*` entry points

use std::os::raw::c_int;

use crate::types::{telephony_call_state_e, telephony_h};
use crate::{check_out, guard, handle_ref, runtime};

/// State of voice and emergency calls.
#[no_mangle]
pub unsafe extern "C" fn telephony_call_get_voice_call_state(
    handle: telephony_h,
    call_state: *mut telephony_call_state_e,
) -> c_int {
    guard("telephony_call_get_voice_call_state", || {
        runtime::check_supported()?;
        // SAFETY: handle validity is the caller's contract.
        let telephony = unsafe { handle_ref(handle) }?;
        check_out(call_state, "call_state")?;

        let state = telephony.voice_call_state()?;
        // SAFETY: checked non-null above.
        unsafe { *call_state = state.into() };
        Ok(())
    })
}

/// State of video calls.
#[no_mangle]
pub unsafe extern "C" fn telephony_call_get_video_call_state(
    handle: telephony_h,
    call_state: *mut telephony_call_state_e,
) -> c_int {
    guard("telephony_call_get_video_call_state", || {
        runtime::check_supported()?;
        // SAFETY: handle validity is the caller's contract.
        let telephony = unsafe { handle_ref(handle) }?;
        check_out(call_state, "call_state")?;

        let state = telephony.video_call_state()?;
        // SAFETY: checked non-null above.
        unsafe { *call_state = state.into() };
        Ok(())
    })
}
