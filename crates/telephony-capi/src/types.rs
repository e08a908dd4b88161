//! C-compatible types and their conversions from the core API
#![allow(non_camel_case_types)]

use std::os::raw::{c_int, c_uint, c_void};

use telephony_core::{CallState, NetworkType, Rssi, ServiceState};

/// Opaque handle on one modem
pub type telephony_h = *mut c_void;

/// Handles returned by `telephony_init`
#[repr(C)]
#[derive(Debug)]
pub struct telephony_handle_list_s {
    pub count: c_uint,
    pub handle: *mut telephony_h,
}

/// Notification callback; `data` points to an `int` holding the new value.
pub type telephony_noti_cb = Option<
    unsafe extern "C" fn(handle: telephony_h, noti_id: c_int, data: *mut c_void, user_data: *mut c_void),
>;

pub const TELEPHONY_ERROR_NONE: c_int = telephony_core::error::ERROR_NONE;
pub const TELEPHONY_ERROR_OUT_OF_MEMORY: c_int = -12;
pub const TELEPHONY_ERROR_PERMISSION_DENIED: c_int = -13;
pub const TELEPHONY_ERROR_INVALID_PARAMETER: c_int = -22;
pub const TELEPHONY_ERROR_NOT_SUPPORTED: c_int = -1_073_741_822;
pub const TELEPHONY_ERROR_OPERATION_FAILED: c_int = -0x0260_0000 | 0x0001;

pub const TELEPHONY_NOTI_NETWORK_SERVICE_STATE: c_int = 0x20;
pub const TELEPHONY_NOTI_NETWORK_CELLID: c_int = 0x21;
pub const TELEPHONY_NOTI_NETWORK_ROAMING_STATUS: c_int = 0x22;
pub const TELEPHONY_NOTI_NETWORK_SIGNALSTRENGTH_LEVEL: c_int = 0x23;
pub const TELEPHONY_NOTI_VOICE_CALL_STATE: c_int = 0x30;
pub const TELEPHONY_NOTI_VIDEO_CALL_STATE: c_int = 0x31;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum telephony_call_state_e {
    TELEPHONY_CALL_STATE_IDLE = 0,
    TELEPHONY_CALL_STATE_CONNECTING = 1,
    TELEPHONY_CALL_STATE_CONNECTED = 2,
}

impl From<CallState> for telephony_call_state_e {
    fn from(state: CallState) -> Self {
        match state {
            CallState::Idle => Self::TELEPHONY_CALL_STATE_IDLE,
            CallState::Connecting => Self::TELEPHONY_CALL_STATE_CONNECTING,
            CallState::Connected => Self::TELEPHONY_CALL_STATE_CONNECTED,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum telephony_network_rssi_e {
    TELEPHONY_NETWORK_RSSI_0 = 0,
    TELEPHONY_NETWORK_RSSI_1 = 1,
    TELEPHONY_NETWORK_RSSI_2 = 2,
    TELEPHONY_NETWORK_RSSI_3 = 3,
    TELEPHONY_NETWORK_RSSI_4 = 4,
    TELEPHONY_NETWORK_RSSI_5 = 5,
    TELEPHONY_NETWORK_RSSI_6 = 6,
}

impl From<Rssi> for telephony_network_rssi_e {
    fn from(rssi: Rssi) -> Self {
        match rssi {
            Rssi::Rssi0 => Self::TELEPHONY_NETWORK_RSSI_0,
            Rssi::Rssi1 => Self::TELEPHONY_NETWORK_RSSI_1,
            Rssi::Rssi2 => Self::TELEPHONY_NETWORK_RSSI_2,
            Rssi::Rssi3 => Self::TELEPHONY_NETWORK_RSSI_3,
            Rssi::Rssi4 => Self::TELEPHONY_NETWORK_RSSI_4,
            Rssi::Rssi5 => Self::TELEPHONY_NETWORK_RSSI_5,
            Rssi::Rssi6 => Self::TELEPHONY_NETWORK_RSSI_6,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum telephony_network_type_e {
    TELEPHONY_NETWORK_TYPE_UNKNOWN = 0,
    TELEPHONY_NETWORK_TYPE_GSM = 1,
    TELEPHONY_NETWORK_TYPE_GPRS = 2,
    TELEPHONY_NETWORK_TYPE_EDGE = 3,
    TELEPHONY_NETWORK_TYPE_UMTS = 4,
    TELEPHONY_NETWORK_TYPE_HSDPA = 5,
    TELEPHONY_NETWORK_TYPE_LTE = 6,
}

impl From<NetworkType> for telephony_network_type_e {
    fn from(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Unknown => Self::TELEPHONY_NETWORK_TYPE_UNKNOWN,
            NetworkType::Gsm => Self::TELEPHONY_NETWORK_TYPE_GSM,
            NetworkType::Gprs => Self::TELEPHONY_NETWORK_TYPE_GPRS,
            NetworkType::Edge => Self::TELEPHONY_NETWORK_TYPE_EDGE,
            NetworkType::Umts => Self::TELEPHONY_NETWORK_TYPE_UMTS,
            NetworkType::Hsdpa => Self::TELEPHONY_NETWORK_TYPE_HSDPA,
            NetworkType::Lte => Self::TELEPHONY_NETWORK_TYPE_LTE,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum telephony_network_service_state_e {
    TELEPHONY_NETWORK_SERVICE_STATE_IN_SERVICE = 0,
    TELEPHONY_NETWORK_SERVICE_STATE_OUT_OF_SERVICE = 1,
    TELEPHONY_NETWORK_SERVICE_STATE_EMERGENCY_ONLY = 2,
}

impl From<ServiceState> for telephony_network_service_state_e {
    fn from(state: ServiceState) -> Self {
        match state {
            ServiceState::InService => Self::TELEPHONY_NETWORK_SERVICE_STATE_IN_SERVICE,
            ServiceState::OutOfService => Self::TELEPHONY_NETWORK_SERVICE_STATE_OUT_OF_SERVICE,
            ServiceState::EmergencyOnly => Self::TELEPHONY_NETWORK_SERVICE_STATE_EMERGENCY_ONLY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telephony_core::TelephonyError;

    #[test]
    fn error_constants_agree_with_core() {
        assert_eq!(
            TELEPHONY_ERROR_INVALID_PARAMETER,
            TelephonyError::invalid_parameter("x").code()
        );
        assert_eq!(
            TELEPHONY_ERROR_OPERATION_FAILED,
            TelephonyError::operation_failed("x").code()
        );
        assert_eq!(TELEPHONY_ERROR_NOT_SUPPORTED, TelephonyError::NotSupported.code());
        assert_eq!(
            TELEPHONY_ERROR_PERMISSION_DENIED,
            TelephonyError::PermissionDenied.code()
        );
        assert_eq!(TELEPHONY_ERROR_OUT_OF_MEMORY, TelephonyError::OutOfMemory.code());
    }

    #[test]
    fn noti_constants_agree_with_core() {
        use telephony_core::NotificationId;
        assert_eq!(
            NotificationId::from_code(TELEPHONY_NOTI_VOICE_CALL_STATE),
            Some(NotificationId::VoiceCallState)
        );
        assert_eq!(
            NotificationId::from_code(TELEPHONY_NOTI_NETWORK_SIGNALSTRENGTH_LEVEL),
            Some(NotificationId::NetworkSignalStrengthLevel)
        );
    }

    #[test]
    fn enum_discriminants_are_stable() {
        assert_eq!(
            telephony_call_state_e::from(CallState::Connected) as c_int,
            2
        );
        assert_eq!(
            telephony_network_type_e::from(NetworkType::Lte) as c_int,
            6
        );
        assert_eq!(
            telephony_network_service_state_e::from(ServiceState::EmergencyOnly) as c_int,
            2
        );
    }
}
