//! Public error type for the telephony information API
//!
//! Every operation reports one of a handful of coarse outcomes. Daemon
//! status codes ([`TapiError`](crate::tapi::TapiError)) and bus failures
//! ([`BusError`](crate::tapi::BusError)) are translated into these variants
//! before they reach callers, so the set below is the complete public
//! contract.
//!
//! Each variant carries a stable integer code that the C ABI returns
//! verbatim; see [`TelephonyError::code`].

use thiserror::Error;

/// Result type for telephony operations
pub type Result<T> = std::result::Result<T, TelephonyError>;

/// Code returned by the C ABI on success.
pub const ERROR_NONE: i32 = 0;

const TIZEN_ERROR_TELEPHONY: i32 = -0x0260_0000;
const TIZEN_ERROR_MIN_PLATFORM_ERROR: i32 = -1_073_741_824;

/// Errors reported by the telephony information API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelephonyError {
    /// A handle, output location or identifier was not usable
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: String },

    /// The caller lacks the telephony privilege
    #[error("Permission denied")]
    PermissionDenied,

    /// The telephony feature is disabled on this device
    #[error("Telephony feature is not supported")]
    NotSupported,

    /// The daemon failed, replied with garbage, or the feature lookup failed
    #[error("Operation failed: {reason}")]
    OperationFailed { reason: String },

    /// An output buffer could not be allocated
    #[error("Out of memory")]
    OutOfMemory,
}

impl TelephonyError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(what: impl Into<String>) -> Self {
        Self::InvalidParameter { what: what.into() }
    }

    /// Create an operation failed error
    pub fn operation_failed(reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            reason: reason.into(),
        }
    }

    /// Stable integer code of this error, as returned by the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            Self::OutOfMemory => -12,
            Self::PermissionDenied => -13,
            Self::InvalidParameter { .. } => -22,
            Self::NotSupported => TIZEN_ERROR_MIN_PLATFORM_ERROR + 2,
            Self::OperationFailed { .. } => TIZEN_ERROR_TELEPHONY | 0x0001,
        }
    }

    /// Short upper-case name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }
}

/// Collapse a `Result` into the C status code.
pub fn status_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => ERROR_NONE,
        Err(e) => e.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_platform_values() {
        assert_eq!(TelephonyError::OutOfMemory.code(), -12);
        assert_eq!(TelephonyError::PermissionDenied.code(), -13);
        assert_eq!(TelephonyError::invalid_parameter("handle").code(), -22);
        assert_eq!(TelephonyError::NotSupported.code(), -1_073_741_822);
        assert_eq!(
            TelephonyError::operation_failed("x").code(),
            -0x0260_0000 | 0x0001
        );
    }

    #[test]
    fn status_code_of_ok_is_none() {
        let ok: Result<u8> = Ok(1);
        let err: Result<u8> = Err(TelephonyError::PermissionDenied);
        assert_eq!(status_code(&ok), ERROR_NONE);
        assert_eq!(status_code(&err), -13);
    }
}
