//! Voice and video call state
//!
//! The daemon reports one record per call. Applications only want to know
//! whether a call is being set up, is up, or there is nothing going on, so
//! the records of one call family are folded into a single [`CallState`]:
//!
//! - a dialing, alerting, incoming or waiting call makes the result
//!   `Connecting`, whatever else is up;
//! - otherwise an active or held call makes it `Connected`;
//! - idle records and calls of the other family change nothing.

use serde::Serialize;
use tracing::{debug, error, info, trace};

use crate::error::{Result, TelephonyError};
use crate::handle::TelephonyHandle;
use crate::tapi::{CallStatus, CallSubState, CallType, TapiError};

/// Coarse state of all calls of one family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CallState {
    /// There are no calls
    #[default]
    Idle,
    /// At least one call is dialing, alerting, incoming or waiting
    Connecting,
    /// Active or held calls exist and none is being set up
    Connected,
}

/// Which calls an aggregate is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallFamily {
    /// Voice and emergency calls
    Voice,
    /// Video calls
    Video,
}

impl CallFamily {
    pub fn includes(self, call_type: CallType) -> bool {
        match self {
            Self::Voice => matches!(call_type, CallType::Voice | CallType::E911),
            Self::Video => call_type == CallType::Data,
        }
    }
}

fn fold_call_state(current: CallState, sub_state: CallSubState) -> CallState {
    match sub_state {
        CallSubState::Active | CallSubState::Held if current != CallState::Connecting => {
            CallState::Connected
        }
        CallSubState::Dialing
        | CallSubState::Alert
        | CallSubState::Incoming
        | CallSubState::Waiting => CallState::Connecting,
        // Idle records must not override a multi-party call that is still up.
        _ => current,
    }
}

/// Fold daemon call records into the state of `family`.
pub fn aggregate_call_state<'a, I>(records: I, family: CallFamily) -> CallState
where
    I: IntoIterator<Item = &'a CallStatus>,
{
    records
        .into_iter()
        .filter(|record| family.includes(record.call_type))
        .fold(CallState::Idle, |state, record| {
            trace!("call {} {:?}: {:?}", record.call_id, record.call_type, record.state);
            fold_call_state(state, record.state)
        })
}

pub(crate) fn map_tapi_error(err: TapiError) -> TelephonyError {
    if err == TapiError::AccessDenied {
        error!("PERMISSION_DENIED");
        TelephonyError::PermissionDenied
    } else {
        error!("OPERATION_FAILED: {}", err);
        TelephonyError::operation_failed(err.to_string())
    }
}

impl TelephonyHandle {
    /// State of voice (including emergency) calls.
    pub fn voice_call_state(&self) -> Result<CallState> {
        self.call_state(CallFamily::Voice)
    }

    /// State of video calls.
    pub fn video_call_state(&self) -> Result<CallState> {
        self.call_state(CallFamily::Video)
    }

    pub fn call_state(&self, family: CallFamily) -> Result<CallState> {
        let client = self.prepare()?;
        debug!("Querying {:?} call state on {}", family, client.cp_name());

        let records = client.call_status_all().map_err(map_tapi_error)?;
        let state = aggregate_call_state(&records, family);
        info!("call_state: [{:?}]", state);
        Ok(state)
    }
}
