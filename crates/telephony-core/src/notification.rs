//! State change notifications
//!
//! A notification id stands for one or more daemon events. Registering a
//! callback subscribes to those events on the handle's modem; when one
//! fires, its payload is translated into the public value type before the
//! callback sees it. Call notifications do not trust the event payload:
//! they re-read every call record and deliver the aggregated state.
//!
//! How events travel from the daemon (threads, main loops) is up to the
//! [`TapiClient`] implementation; callbacks run on whatever thread it
//! delivers on.

use std::sync::{Arc, Weak};

use tracing::{debug, error, warn};

use crate::call::{aggregate_call_state, map_tapi_error, CallFamily, CallState};
use crate::error::{Result, TelephonyError};
use crate::handle::TelephonyHandle;
use crate::network::{Rssi, ServiceState};
use crate::tapi::{EventPayload, EventSink, ServiceType, TapiClient};

const VOICE_CALL_EVENTS: &[&str] = &[
    "org.tizen.telephony.Call:VoiceCallStatusIdle",
    "org.tizen.telephony.Call:VoiceCallStatusActive",
    "org.tizen.telephony.Call:VoiceCallStatusHeld",
    "org.tizen.telephony.Call:VoiceCallStatusDialing",
    "org.tizen.telephony.Call:VoiceCallStatusAlert",
    "org.tizen.telephony.Call:VoiceCallStatusIncoming",
];

const VIDEO_CALL_EVENTS: &[&str] = &[
    "org.tizen.telephony.Call:VideoCallStatusIdle",
    "org.tizen.telephony.Call:VideoCallStatusActive",
    "org.tizen.telephony.Call:VideoCallStatusDialing",
    "org.tizen.telephony.Call:VideoCallStatusAlert",
    "org.tizen.telephony.Call:VideoCallStatusIncoming",
];

/// What a callback can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationId {
    NetworkServiceState,
    NetworkCellId,
    NetworkRoamingStatus,
    NetworkSignalStrengthLevel,
    VoiceCallState,
    VideoCallState,
}

impl NotificationId {
    pub const ALL: [NotificationId; 6] = [
        Self::NetworkServiceState,
        Self::NetworkCellId,
        Self::NetworkRoamingStatus,
        Self::NetworkSignalStrengthLevel,
        Self::VoiceCallState,
        Self::VideoCallState,
    ];

    /// Value of the id in the C ABI.
    pub fn code(self) -> i32 {
        match self {
            Self::NetworkServiceState => 0x20,
            Self::NetworkCellId => 0x21,
            Self::NetworkRoamingStatus => 0x22,
            Self::NetworkSignalStrengthLevel => 0x23,
            Self::VoiceCallState => 0x30,
            Self::VideoCallState => 0x31,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }

    /// Daemon events backing this id.
    pub fn events(self) -> &'static [&'static str] {
        match self {
            Self::NetworkServiceState => &[NETWORK_SERVICE_TYPE_EVENT],
            Self::NetworkCellId => &[NETWORK_CELL_ID_EVENT],
            Self::NetworkRoamingStatus => &[NETWORK_ROAMING_EVENT],
            Self::NetworkSignalStrengthLevel => &[NETWORK_SIGNAL_EVENT],
            Self::VoiceCallState => VOICE_CALL_EVENTS,
            Self::VideoCallState => VIDEO_CALL_EVENTS,
        }
    }
}

// Property change events share the property's name.
const NETWORK_SERVICE_TYPE_EVENT: &str = "org.tizen.telephony.Network:service_type";
const NETWORK_CELL_ID_EVENT: &str = "org.tizen.telephony.Network:cell_id";
const NETWORK_ROAMING_EVENT: &str = "org.tizen.telephony.Network:roaming_status";
const NETWORK_SIGNAL_EVENT: &str = "org.tizen.telephony.Network:sig_level";

/// Translated notification value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationValue {
    ServiceState(ServiceState),
    CellId(i32),
    RoamingStatus(bool),
    SignalStrength(Rssi),
    CallState(CallState),
}

impl NotificationValue {
    /// Integer representation handed to C callbacks.
    pub fn as_raw(&self) -> i32 {
        match self {
            Self::ServiceState(state) => *state as i32,
            Self::CellId(cell_id) => *cell_id,
            Self::RoamingStatus(roaming) => i32::from(*roaming),
            Self::SignalStrength(rssi) => rssi.level(),
            Self::CallState(state) => *state as i32,
        }
    }
}

/// Events a notification id holds on the daemon, and the sink they deliver to
pub(crate) struct Registration {
    pub(crate) events: Vec<&'static str>,
    sink: Arc<dyn EventSink>,
}

/// A delivered notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub value: NotificationValue,
}

pub type NotificationCallback = Arc<dyn Fn(&Notification) + Send + Sync>;

struct NotificationSink {
    id: NotificationId,
    client: Weak<dyn TapiClient>,
    callback: NotificationCallback,
}

impl NotificationSink {
    fn translate(&self, event: &str, payload: &EventPayload) -> Option<NotificationValue> {
        let int_payload = || match payload {
            EventPayload::Int(value) => Some(*value),
            other => {
                warn!("Unexpected payload {:?} for {}", other, event);
                None
            }
        };

        match self.id {
            NotificationId::NetworkServiceState => int_payload()
                .map(|raw| NotificationValue::ServiceState(ServiceType::from_raw(raw).into())),
            NotificationId::NetworkCellId => int_payload().map(NotificationValue::CellId),
            NotificationId::NetworkRoamingStatus => {
                int_payload().map(|raw| NotificationValue::RoamingStatus(raw != 0))
            }
            NotificationId::NetworkSignalStrengthLevel => int_payload()
                .and_then(Rssi::from_level)
                .map(NotificationValue::SignalStrength),
            NotificationId::VoiceCallState => self.current_call_state(CallFamily::Voice),
            NotificationId::VideoCallState => self.current_call_state(CallFamily::Video),
        }
    }

    fn current_call_state(&self, family: CallFamily) -> Option<NotificationValue> {
        let client = self.client.upgrade()?;
        match client.call_status_all() {
            Ok(records) => Some(NotificationValue::CallState(aggregate_call_state(
                &records, family,
            ))),
            Err(e) => {
                warn!("Cannot refresh {:?} call state: {}", family, e);
                None
            }
        }
    }
}

impl EventSink for NotificationSink {
    fn on_event(&self, event: &str, payload: &EventPayload) {
        match self.translate(event, payload) {
            Some(value) => {
                debug!("Noti {:?}: {:?}", self.id, value);
                (self.callback)(&Notification { id: self.id, value });
            }
            None => warn!("Dropping {} for {:?}", event, self.id),
        }
    }
}

impl TelephonyHandle {
    /// Call `callback` whenever `id` changes. Replaces an earlier callback
    /// for the same id.
    pub fn set_notification_callback<F>(&self, id: NotificationId, callback: F) -> Result<()>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let client = self.prepare()?;
        let mut notifications = self.notifications.lock();

        let sink: Arc<dyn EventSink> = Arc::new(NotificationSink {
            id,
            client: Arc::downgrade(&client),
            callback: Arc::new(callback),
        });

        // Registering over an existing event swaps its sink; on failure the
        // earlier sink is put back.
        let previous = notifications.get(&id);
        let mut registered = Vec::with_capacity(id.events().len());
        for &event in id.events() {
            if let Err(e) = client.register_event(event, sink.clone()) {
                error!("Failed to register {}: {}", event, e);
                for done in registered {
                    let restored = match previous {
                        Some(previous) => client.register_event(done, previous.sink.clone()),
                        None => client.deregister_event(done),
                    };
                    if let Err(e) = restored {
                        warn!("Failed to roll back {} for {:?}: {}", done, id, e);
                    }
                }
                return Err(map_tapi_error(e));
            }
            registered.push(event);
        }

        if previous.is_some() {
            debug!("Replaced callback for {:?}", id);
        }
        notifications.insert(id, Registration { events: registered, sink });
        debug!("Registered {:?} on {}", id, client.cp_name());
        Ok(())
    }

    pub fn unset_notification_callback(&self, id: NotificationId) -> Result<()> {
        let client = self.prepare()?;
        let Some(Registration { events, .. }) = self.notifications.lock().remove(&id) else {
            error!("INVALID_PARAMETER: {:?} is not registered", id);
            return Err(TelephonyError::invalid_parameter(format!(
                "{:?} is not registered",
                id
            )));
        };

        let mut failure = None;
        for event in events {
            if let Err(e) = client.deregister_event(event) {
                error!("Failed to deregister {}: {}", event, e);
                failure.get_or_insert(e);
            }
        }
        match failure {
            Some(e) => Err(TelephonyError::operation_failed(e.to_string())),
            None => Ok(()),
        }
    }

    /// Ids with a registered callback.
    pub fn registered_notifications(&self) -> Vec<NotificationId> {
        let notifications = self.notifications.lock();
        NotificationId::ALL
            .into_iter()
            .filter(|id| notifications.contains_key(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tapi::Property;

    #[test]
    fn ids_round_trip_through_codes() {
        for id in NotificationId::ALL {
            assert_eq!(NotificationId::from_code(id.code()), Some(id));
        }
        assert_eq!(NotificationId::from_code(0x10), None);
    }

    #[test]
    fn network_events_are_property_names() {
        assert_eq!(
            NotificationId::NetworkCellId.events(),
            &[Property::CellId.name()]
        );
        assert_eq!(
            NotificationId::NetworkServiceState.events(),
            &[Property::ServiceType.name()]
        );
    }

    #[test]
    fn raw_values() {
        assert_eq!(
            NotificationValue::CallState(CallState::Connected).as_raw(),
            2
        );
        assert_eq!(
            NotificationValue::ServiceState(ServiceState::EmergencyOnly).as_raw(),
            2
        );
        assert_eq!(NotificationValue::RoamingStatus(true).as_raw(), 1);
        assert_eq!(NotificationValue::SignalStrength(Rssi::Rssi5).as_raw(), 5);
    }
}
