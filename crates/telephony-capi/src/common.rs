//! Handle lifecycle and notifications

use std::os::raw::{c_int, c_void};
use std::sync::Arc;

use tracing::{error, info};

use telephony_core::{NotificationId, TelephonyError, TelephonyHandle};

use crate::types::{telephony_h, telephony_handle_list_s, telephony_noti_cb};
use crate::{check_out, guard, handle_ref, into_raw_handle, runtime};

/// Open one handle per modem.
#[no_mangle]
pub unsafe extern "C" fn telephony_init(list: *mut telephony_handle_list_s) -> c_int {
    guard("telephony_init", || {
        let runtime = runtime::check_supported()?;
        check_out(list, "list")?;

        let Some(connector) = runtime.connector else {
            error!("No telephony daemon configured");
            return Err(TelephonyError::operation_failed("no telephony daemon configured"));
        };
        let handles = telephony_core::init(connector.as_ref(), runtime.features)?.into_handles();

        let count = handles.len();
        let raw: *mut telephony_h = if handles.is_empty() {
            std::ptr::null_mut()
        } else {
            let boxed: Box<[telephony_h]> = handles.into_iter().map(into_raw_handle).collect();
            Box::into_raw(boxed).cast()
        };

        // SAFETY: checked non-null above; the caller owns the list storage.
        unsafe {
            (*list).count = count as _;
            (*list).handle = raw;
        }
        info!("telephony_init: {} handle(s)", count);
        Ok(())
    })
}

/// Release every handle of `list`.
#[no_mangle]
pub unsafe extern "C" fn telephony_deinit(list: *mut telephony_handle_list_s) -> c_int {
    guard("telephony_deinit", || {
        runtime::check_supported()?;
        check_out(list, "list")?;

        // SAFETY: checked non-null above; `handle` was built by telephony_init.
        unsafe {
            let count = (*list).count as usize;
            let raw = (*list).handle;
            if !raw.is_null() {
                let handles = Box::from_raw(std::ptr::slice_from_raw_parts_mut(raw, count));
                for &handle in handles.iter() {
                    if handle.is_null() {
                        continue;
                    }
                    let handle = Box::from_raw(handle.cast::<Arc<TelephonyHandle>>());
                    handle.release();
                }
            }
            (*list).count = 0;
            (*list).handle = std::ptr::null_mut();
        }
        Ok(())
    })
}

#[derive(Clone, Copy)]
struct RawContext {
    handle: usize,
    user_data: usize,
}

/// Register `callback` for `noti_id` on `handle`.
#[no_mangle]
pub unsafe extern "C" fn telephony_set_noti_cb(
    handle: telephony_h,
    noti_id: c_int,
    callback: telephony_noti_cb,
    user_data: *mut c_void,
) -> c_int {
    guard("telephony_set_noti_cb", || {
        runtime::check_supported()?;
        // SAFETY: handle validity is the caller's contract.
        let telephony = unsafe { handle_ref(handle) }?;
        let Some(callback) = callback else {
            error!("INVALID_PARAMETER: callback is NULL");
            return Err(TelephonyError::invalid_parameter("callback"));
        };
        let id = notification_id(noti_id)?;

        let context = RawContext {
            handle: handle as usize,
            user_data: user_data as usize,
        };
        telephony.set_notification_callback(id, move |notification| {
            let mut value: c_int = notification.value.as_raw();
            // SAFETY: the callback and its user data were supplied together by
            // the caller, which keeps them valid until unset or deinit.
            unsafe {
                callback(
                    context.handle as telephony_h,
                    notification.id.code(),
                    (&mut value as *mut c_int).cast(),
                    context.user_data as *mut c_void,
                )
            };
        })
    })
}

/// Stop notifying `noti_id` on `handle`.
#[no_mangle]
pub unsafe extern "C" fn telephony_unset_noti_cb(handle: telephony_h, noti_id: c_int) -> c_int {
    guard("telephony_unset_noti_cb", || {
        runtime::check_supported()?;
        // SAFETY: handle validity is the caller's contract.
        let telephony = unsafe { handle_ref(handle) }?;
        let id = notification_id(noti_id)?;
        telephony.unset_notification_callback(id)
    })
}

fn notification_id(noti_id: c_int) -> Result<NotificationId, TelephonyError> {
    NotificationId::from_code(noti_id).ok_or_else(|| {
        error!("INVALID_PARAMETER: unknown noti_id {}", noti_id);
        TelephonyError::invalid_parameter(format!("noti_id {}", noti_id))
    })
}
