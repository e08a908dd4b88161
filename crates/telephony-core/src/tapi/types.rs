//! Values exchanged with the telephony daemon
//!
//! These mirror what the daemon reports, before any mapping into the public
//! enums of [`crate::call`] and [`crate::network`].

use serde::{Deserialize, Serialize};

/// Kind of call as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Voice,
    /// Video call; the daemon files these under "data"
    Data,
    /// Emergency call
    E911,
}

/// Per-call state as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSubState {
    Idle,
    Active,
    Held,
    Dialing,
    Alert,
    Incoming,
    Waiting,
}

/// One call record from `call_status_all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStatus {
    #[serde(default)]
    pub call_id: u32,
    pub call_type: CallType,
    pub state: CallSubState,
    #[serde(default)]
    pub number: String,
}

impl CallStatus {
    pub fn new(call_id: u32, call_type: CallType, state: CallSubState) -> Self {
        Self {
            call_id,
            call_type,
            state,
            number: String::new(),
        }
    }
}

/// Network service type as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Unknown,
    NoService,
    Emergency,
    Search,
    #[serde(rename = "2g")]
    Gen2,
    #[serde(rename = "2.5g")]
    Gen2_5,
    #[serde(rename = "2.5g_edge")]
    Gen2_5Edge,
    #[serde(rename = "3g")]
    Gen3,
    Hsdpa,
    Lte,
}

impl ServiceType {
    /// Decode the integer carried by service-type properties and events.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::NoService,
            2 => Self::Emergency,
            3 => Self::Search,
            4 => Self::Gen2,
            5 => Self::Gen2_5,
            6 => Self::Gen2_5Edge,
            7 => Self::Gen3,
            8 => Self::Hsdpa,
            9 => Self::Lte,
            _ => Self::Unknown,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::NoService => 1,
            Self::Emergency => 2,
            Self::Search => 3,
            Self::Gen2 => 4,
            Self::Gen2_5 => 5,
            Self::Gen2_5Edge => 6,
            Self::Gen3 => 7,
            Self::Hsdpa => 8,
            Self::Lte => 9,
        }
    }
}

/// Network properties readable through the typed client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Lac,
    CellId,
    SignalStrengthLevel,
    RoamingStatus,
    Plmn,
    NetworkName,
    ServiceType,
}

impl Property {
    /// Fully qualified daemon property name; also the name of its change event.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lac => "org.tizen.telephony.Network:lac",
            Self::CellId => "org.tizen.telephony.Network:cell_id",
            Self::SignalStrengthLevel => "org.tizen.telephony.Network:sig_level",
            Self::RoamingStatus => "org.tizen.telephony.Network:roaming_status",
            Self::Plmn => "org.tizen.telephony.Network:plmn",
            Self::NetworkName => "org.tizen.telephony.Network:network_name",
            Self::ServiceType => "org.tizen.telephony.Network:service_type",
        }
    }
}

/// Argument or reply value of a direct bus call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BusValue {
    Int(i32),
    Str(String),
}

/// Data attached to a daemon event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    Int(i32),
    Str(String),
    /// Call status events carry the id of the call that changed
    Call { call_id: u32 },
}
