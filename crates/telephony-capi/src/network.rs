//! `telephony_network_*` entry points

use std::ffi::c_char;
use std::os::raw::c_int;

use telephony_core::{NetworkType, Rssi, ServiceState, TelephonyError};

use crate::types::{
    telephony_h, telephony_network_rssi_e, telephony_network_service_state_e,
    telephony_network_type_e,
};
use crate::{check_out, guard, handle_ref, malloc_string, runtime};

/// Conversion of a core value into what the C caller receives.
trait IntoC<T> {
    fn into_c(self) -> Result<T, TelephonyError>;
}

impl IntoC<c_int> for i32 {
    fn into_c(self) -> Result<c_int, TelephonyError> {
        Ok(self)
    }
}

impl IntoC<bool> for bool {
    fn into_c(self) -> Result<bool, TelephonyError> {
        Ok(self)
    }
}

impl IntoC<telephony_network_rssi_e> for Rssi {
    fn into_c(self) -> Result<telephony_network_rssi_e, TelephonyError> {
        Ok(self.into())
    }
}

impl IntoC<telephony_network_type_e> for NetworkType {
    fn into_c(self) -> Result<telephony_network_type_e, TelephonyError> {
        Ok(self.into())
    }
}

impl IntoC<telephony_network_service_state_e> for ServiceState {
    fn into_c(self) -> Result<telephony_network_service_state_e, TelephonyError> {
        Ok(self.into())
    }
}

/// Allocated with `malloc`; the caller frees it.
impl IntoC<*mut c_char> for String {
    fn into_c(self) -> Result<*mut c_char, TelephonyError> {
        malloc_string(&self)
    }
}

macro_rules! network_getter {
    ($(#[$meta:meta])* $name:ident($out:ident: $ty:ty) => $method:ident) => {
        $(#[$meta])*
        #[no_mangle]
        pub unsafe extern "C" fn $name(handle: telephony_h, $out: *mut $ty) -> c_int {
            guard(stringify!($name), || {
                runtime::check_supported()?;
                // SAFETY: handle validity is the caller's contract.
                let telephony = unsafe { handle_ref(handle) }?;
                check_out($out, stringify!($out))?;

                let value: $ty = telephony.$method()?.into_c()?;
                // SAFETY: checked non-null above.
                unsafe { *$out = value };
                Ok(())
            })
        }
    };
}

network_getter! {
    /// Location area code.
    telephony_network_get_lac(lac: c_int) => lac
}

network_getter! {
    telephony_network_get_cell_id(cell_id: c_int) => cell_id
}

network_getter! {
    /// Signal strength, `TELEPHONY_NETWORK_RSSI_6` being the strongest.
    telephony_network_get_rssi(rssi: telephony_network_rssi_e) => rssi
}

network_getter! {
    telephony_network_get_roaming_status(status: bool) => roaming_status
}

network_getter! {
    /// Mobile country code. Release `mcc` with `free()`.
    telephony_network_get_mcc(mcc: *mut c_char) => mcc
}

network_getter! {
    /// Mobile network code. Release `mnc` with `free()`.
    telephony_network_get_mnc(mnc: *mut c_char) => mnc
}

network_getter! {
    /// Name of the registered network. Release `network_name` with `free()`.
    telephony_network_get_network_name(network_name: *mut c_char) => network_name
}

network_getter! {
    telephony_network_get_type(network_type: telephony_network_type_e) => network_type
}

network_getter! {
    telephony_network_get_service_state(
        network_service_state: telephony_network_service_state_e
    ) => service_state
}
