//! Daemon-side status codes and bus failures

use thiserror::Error;

/// Status codes returned by the telephony daemon's typed client contract.
///
/// `TAPI_API_SUCCESS` (0) has no variant; success is `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TapiError {
    #[error("invalid input")]
    InvalidInput,
    #[error("invalid pointer")]
    InvalidPointer,
    #[error("not supported by the modem")]
    NotSupported,
    #[error("daemon out of memory")]
    OutOfMemory,
    #[error("rpc link down")]
    RpcLinkDown,
    #[error("service not ready")]
    ServiceNotReady,
    #[error("server failure")]
    ServerFailure,
    #[error("transport layer failure")]
    TransportFailure,
    #[error("unknown event")]
    UnknownEvent,
    #[error("event registration failed")]
    RegistrationFailed,
    #[error("operation failed")]
    OperationFailed,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("access denied")]
    AccessDenied,
    #[error("unrecognised daemon status {0}")]
    Other(i32),
}

impl TapiError {
    /// Decode a raw daemon status. Returns `None` for success.
    pub fn from_code(code: i32) -> Option<Self> {
        let err = match code {
            0 => return None,
            -1 => Self::InvalidInput,
            -2 => Self::InvalidPointer,
            -3 => Self::NotSupported,
            -5 => Self::OutOfMemory,
            -6 => Self::RpcLinkDown,
            -7 => Self::ServiceNotReady,
            -8 => Self::ServerFailure,
            -10 => Self::TransportFailure,
            -15 => Self::UnknownEvent,
            -16 => Self::RegistrationFailed,
            -17 => Self::OperationFailed,
            -18 => Self::InvalidOperation,
            -19 => Self::AccessDenied,
            other => Self::Other(other),
        };
        Some(err)
    }

    /// Raw daemon status of this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidInput => -1,
            Self::InvalidPointer => -2,
            Self::NotSupported => -3,
            Self::OutOfMemory => -5,
            Self::RpcLinkDown => -6,
            Self::ServiceNotReady => -7,
            Self::ServerFailure => -8,
            Self::TransportFailure => -10,
            Self::UnknownEvent => -15,
            Self::RegistrationFailed => -16,
            Self::OperationFailed => -17,
            Self::InvalidOperation => -18,
            Self::AccessDenied => -19,
            Self::Other(code) => *code,
        }
    }
}

/// Message fragment the bus uses when the caller's credentials are rejected.
pub const ACCESS_DENIED_MESSAGE: &str = "No access rights";

/// Failure of a direct bus method call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bus call failed: {message}")]
pub struct BusError {
    pub message: String,
}

impl BusError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Bus error the daemon raises for callers without the telephony privilege.
    pub fn access_denied(method: &str) -> Self {
        Self::new(format!(
            "GDBus.Error:org.freedesktop.DBus.Error.AccessDenied: {} ({})",
            ACCESS_DENIED_MESSAGE, method
        ))
    }

    pub fn is_access_denied(&self) -> bool {
        self.message.contains(ACCESS_DENIED_MESSAGE)
    }
}
