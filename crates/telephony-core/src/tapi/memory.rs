//! In-process telephony daemon
//!
//! [`MemoryDaemon`] answers the whole daemon contract from a
//! [`DaemonSnapshot`], which can be written by hand as JSON. Individual
//! operations can be denied (the caller lacks the privilege) or made to fail,
//! and events can be pushed to whatever sinks are registered, which is enough
//! to drive every path of the public API without a real modem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    object_path, BusConnection, BusError, BusValue, CallStatus, EventPayload, EventSink,
    Property, ServiceType, TapiClient, TapiConnector, TapiError, MODEM_INTERFACE,
    TELEPHONY_SERVICE,
};
use crate::config::ConfigError;

/// Daemon operations that can be denied or failed per modem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CallStatus,
    Properties,
    Imei,
    /// Event registration
    Events,
    /// Event deregistration
    Deregister,
}

/// Network facts of one modem; a missing value makes its property read fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSnapshot {
    pub lac: Option<i32>,
    pub cell_id: Option<i32>,
    pub sig_level: Option<i32>,
    pub roaming: Option<bool>,
    pub plmn: Option<String>,
    pub network_name: Option<String>,
    pub service_type: Option<ServiceType>,
}

/// Everything the daemon knows about one modem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModemSnapshot {
    pub cp_name: String,
    #[serde(default)]
    pub imei: Option<String>,
    /// Status field of the `GetIMEI` reply
    #[serde(default)]
    pub imei_result: i32,
    #[serde(default)]
    pub calls: Vec<CallStatus>,
    #[serde(default)]
    pub network: NetworkSnapshot,
    /// Operations answered with an access-denied error
    #[serde(default)]
    pub denied: Vec<Operation>,
    /// Operations answered with a generic failure
    #[serde(default)]
    pub failing: Vec<Operation>,
    /// Events whose registration fails
    #[serde(default)]
    pub failing_events: Vec<String>,
    /// Refuse to open a client on this modem
    #[serde(default)]
    pub refuse_connect: bool,
}

impl ModemSnapshot {
    pub fn new(cp_name: impl Into<String>) -> Self {
        Self {
            cp_name: cp_name.into(),
            imei: None,
            imei_result: 0,
            calls: Vec::new(),
            network: NetworkSnapshot::default(),
            denied: Vec::new(),
            failing: Vec::new(),
            failing_events: Vec::new(),
            refuse_connect: false,
        }
    }

    fn check(&self, op: Operation) -> Result<(), TapiError> {
        if self.denied.contains(&op) {
            return Err(TapiError::AccessDenied);
        }
        if self.failing.contains(&op) {
            return Err(TapiError::OperationFailed);
        }
        Ok(())
    }
}

/// Serializable state of the whole daemon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonSnapshot {
    #[serde(default)]
    pub modems: Vec<ModemSnapshot>,
    /// The daemon does not answer modem discovery
    #[serde(default)]
    pub unreachable: bool,
}

impl DaemonSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::parse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&text)
    }
}

/// Identifies one connected client; each keeps its own event list.
type ClientId = u64;

struct ModemState {
    snapshot: ModemSnapshot,
    sinks: BTreeMap<(ClientId, String), Arc<dyn EventSink>>,
}

struct DaemonState {
    unreachable: bool,
    next_client: AtomicU64,
    modems: RwLock<BTreeMap<String, ModemState>>,
}

/// In-process daemon; cheap to clone, clones share state.
#[derive(Clone)]
pub struct MemoryDaemon {
    state: Arc<DaemonState>,
}

impl MemoryDaemon {
    pub fn new(snapshot: DaemonSnapshot) -> Self {
        let modems = snapshot
            .modems
            .into_iter()
            .map(|m| {
                (
                    m.cp_name.clone(),
                    ModemState {
                        snapshot: m,
                        sinks: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self {
            state: Arc::new(DaemonState {
                unreachable: snapshot.unreachable,
                next_client: AtomicU64::new(1),
                modems: RwLock::new(modems),
            }),
        }
    }

    /// Daemon with a single modem.
    pub fn single(modem: ModemSnapshot) -> Self {
        Self::new(DaemonSnapshot {
            modems: vec![modem],
            unreachable: false,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(DaemonSnapshot::from_file(path)?))
    }

    /// Mutate the state of `cp_name`. Returns false when no such modem exists.
    pub fn update_modem(&self, cp_name: &str, f: impl FnOnce(&mut ModemSnapshot)) -> bool {
        let mut modems = self.state.modems.write();
        match modems.get_mut(cp_name) {
            Some(modem) => {
                f(&mut modem.snapshot);
                true
            }
            None => false,
        }
    }

    /// Names of the events registered on `cp_name` by any client, sorted
    /// and without duplicates.
    pub fn registered_events(&self, cp_name: &str) -> Vec<String> {
        let modems = self.state.modems.read();
        let events: BTreeSet<String> = modems
            .get(cp_name)
            .map(|m| m.sinks.keys().map(|(_, event)| event.clone()).collect())
            .unwrap_or_default();
        events.into_iter().collect()
    }

    /// Deliver `event` to every client that registered it on `cp_name`.
    /// Returns whether anyone listened.
    pub fn emit(&self, cp_name: &str, event: &str, payload: EventPayload) -> bool {
        let sinks: Vec<Arc<dyn EventSink>> = {
            let modems = self.state.modems.read();
            modems
                .get(cp_name)
                .map(|m| {
                    m.sinks
                        .iter()
                        .filter(|((_, name), _)| name == event)
                        .map(|(_, sink)| sink.clone())
                        .collect()
                })
                .unwrap_or_default()
        };
        if sinks.is_empty() {
            debug!("No sink for {} on {}", event, cp_name);
            return false;
        }
        debug!("Delivering {} to {} client(s) of {}", event, sinks.len(), cp_name);
        for sink in sinks {
            sink.on_event(event, &payload);
        }
        true
    }

    fn with_modem<T>(
        &self,
        cp_name: &str,
        f: impl FnOnce(&ModemSnapshot) -> Result<T, TapiError>,
    ) -> Result<T, TapiError> {
        let modems = self.state.modems.read();
        match modems.get(cp_name) {
            Some(modem) => f(&modem.snapshot),
            None => Err(TapiError::ServiceNotReady),
        }
    }
}

impl TapiConnector for MemoryDaemon {
    fn cp_name_list(&self) -> Option<Vec<String>> {
        if self.state.unreachable {
            warn!("Daemon unreachable, no modem list");
            return None;
        }
        Some(self.state.modems.read().keys().cloned().collect())
    }

    fn connect(&self, cp_name: &str) -> Option<Arc<dyn TapiClient>> {
        let modems = self.state.modems.read();
        match modems.get(cp_name) {
            Some(modem) if !modem.snapshot.refuse_connect => Some(Arc::new(MemoryClient {
                id: self.state.next_client.fetch_add(1, Ordering::Relaxed),
                daemon: self.clone(),
                cp_name: cp_name.to_string(),
            })),
            _ => None,
        }
    }
}

/// Client bound to one modem of a [`MemoryDaemon`]
pub struct MemoryClient {
    id: ClientId,
    daemon: MemoryDaemon,
    cp_name: String,
}

impl TapiClient for MemoryClient {
    fn cp_name(&self) -> &str {
        &self.cp_name
    }

    fn call_status_all(&self) -> Result<Vec<CallStatus>, TapiError> {
        self.daemon.with_modem(&self.cp_name, |m| {
            m.check(Operation::CallStatus)?;
            Ok(m.calls.clone())
        })
    }

    fn property_int(&self, property: Property) -> Result<i32, TapiError> {
        self.daemon.with_modem(&self.cp_name, |m| {
            m.check(Operation::Properties)?;
            let net = &m.network;
            let value = match property {
                Property::Lac => net.lac,
                Property::CellId => net.cell_id,
                Property::SignalStrengthLevel => net.sig_level,
                Property::RoamingStatus => net.roaming.map(i32::from),
                Property::ServiceType => net.service_type.map(ServiceType::raw),
                Property::Plmn | Property::NetworkName => return Err(TapiError::InvalidInput),
            };
            value.ok_or(TapiError::OperationFailed)
        })
    }

    fn property_string(&self, property: Property) -> Result<String, TapiError> {
        self.daemon.with_modem(&self.cp_name, |m| {
            m.check(Operation::Properties)?;
            let value = match property {
                Property::Plmn => m.network.plmn.clone(),
                Property::NetworkName => m.network.network_name.clone(),
                _ => return Err(TapiError::InvalidInput),
            };
            value.ok_or(TapiError::OperationFailed)
        })
    }

    fn bus(&self) -> &dyn BusConnection {
        self
    }

    fn register_event(&self, event: &str, sink: Arc<dyn EventSink>) -> Result<(), TapiError> {
        let mut modems = self.daemon.state.modems.write();
        let modem = modems
            .get_mut(&self.cp_name)
            .ok_or(TapiError::ServiceNotReady)?;
        modem.snapshot.check(Operation::Events)?;
        if modem.snapshot.failing_events.iter().any(|e| e == event) {
            return Err(TapiError::OperationFailed);
        }
        modem.sinks.insert((self.id, event.to_string()), sink);
        Ok(())
    }

    fn deregister_event(&self, event: &str) -> Result<(), TapiError> {
        let mut modems = self.daemon.state.modems.write();
        let modem = modems
            .get_mut(&self.cp_name)
            .ok_or(TapiError::ServiceNotReady)?;
        modem.snapshot.check(Operation::Deregister)?;
        match modem.sinks.remove(&(self.id, event.to_string())) {
            Some(_) => Ok(()),
            None => Err(TapiError::UnknownEvent),
        }
    }
}

impl BusConnection for MemoryClient {
    fn call_sync(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Vec<BusValue>, BusError> {
        if service != TELEPHONY_SERVICE || path != object_path(&self.cp_name) {
            return Err(BusError::new(format!(
                "GDBus.Error:org.freedesktop.DBus.Error.UnknownObject: {} {}",
                service, path
            )));
        }
        if interface != MODEM_INTERFACE || method != "GetIMEI" {
            return Err(BusError::new(format!(
                "GDBus.Error:org.freedesktop.DBus.Error.UnknownMethod: {}.{}",
                interface, method
            )));
        }

        let modems = self.daemon.state.modems.read();
        let modem = modems
            .get(&self.cp_name)
            .ok_or_else(|| BusError::new("Timeout was reached"))?;
        let snapshot = &modem.snapshot;
        match snapshot.check(Operation::Imei) {
            Err(TapiError::AccessDenied) => return Err(BusError::access_denied(method)),
            Err(_) => return Err(BusError::new("Timeout was reached")),
            Ok(()) => {}
        }
        Ok(vec![
            BusValue::Int(snapshot.imei_result),
            BusValue::Str(snapshot.imei.clone().unwrap_or_default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tapi::{CallSubState, CallType};

    fn daemon() -> MemoryDaemon {
        let mut modem = ModemSnapshot::new("modem0");
        modem.imei = Some("356938035643809".to_string());
        modem.calls.push(CallStatus::new(1, CallType::Voice, CallSubState::Active));
        modem.network.lac = Some(0x1a2b);
        MemoryDaemon::single(modem)
    }

    #[test]
    fn connects_only_to_known_modems() {
        let daemon = daemon();
        assert_eq!(daemon.cp_name_list(), Some(vec!["modem0".to_string()]));
        assert!(daemon.connect("modem0").is_some());
        assert!(daemon.connect("modem1").is_none());
    }

    #[test]
    fn denied_operations_report_access_denied() {
        let daemon = daemon();
        daemon.update_modem("modem0", |m| m.denied.push(Operation::CallStatus));
        let client = daemon.connect("modem0").unwrap();
        assert_eq!(client.call_status_all(), Err(TapiError::AccessDenied));
        assert_eq!(client.property_int(Property::Lac), Ok(0x1a2b));
    }

    #[test]
    fn missing_property_fails() {
        let client = daemon().connect("modem0").unwrap();
        assert_eq!(
            client.property_int(Property::CellId),
            Err(TapiError::OperationFailed)
        );
    }

    struct Counter(parking_lot::Mutex<u32>);

    impl EventSink for Counter {
        fn on_event(&self, _event: &str, _payload: &EventPayload) {
            *self.0.lock() += 1;
        }
    }

    #[test]
    fn clients_keep_separate_event_lists() {
        let daemon = daemon();
        let a = daemon.connect("modem0").unwrap();
        let b = daemon.connect("modem0").unwrap();
        let seen_a = Arc::new(Counter(parking_lot::Mutex::new(0)));
        let seen_b = Arc::new(Counter(parking_lot::Mutex::new(0)));
        let event = Property::CellId.name();

        a.register_event(event, seen_a.clone()).unwrap();
        b.register_event(event, seen_b.clone()).unwrap();
        assert!(daemon.emit("modem0", event, EventPayload::Int(1)));
        assert_eq!((*seen_a.0.lock(), *seen_b.0.lock()), (1, 1));
        assert_eq!(daemon.registered_events("modem0"), vec![event.to_string()]);

        a.deregister_event(event).unwrap();
        assert!(daemon.emit("modem0", event, EventPayload::Int(2)));
        assert_eq!((*seen_a.0.lock(), *seen_b.0.lock()), (1, 2));
        assert_eq!(a.deregister_event(event), Err(TapiError::UnknownEvent));
        b.deregister_event(event).unwrap();
        assert!(!daemon.emit("modem0", event, EventPayload::Int(3)));
    }

    #[test]
    fn failing_event_rejects_only_that_registration() {
        let daemon = daemon();
        let cell_id = Property::CellId.name();
        daemon.update_modem("modem0", |m| m.failing_events.push(cell_id.to_string()));
        let client = daemon.connect("modem0").unwrap();
        let sink = Arc::new(Counter(parking_lot::Mutex::new(0)));

        assert_eq!(
            client.register_event(cell_id, sink.clone()),
            Err(TapiError::OperationFailed)
        );
        assert!(client.register_event(Property::Lac.name(), sink).is_ok());
    }

    #[test]
    fn get_imei_reply_is_status_and_string() {
        let client = daemon().connect("modem0").unwrap();
        let reply = client
            .bus()
            .call_sync(
                TELEPHONY_SERVICE,
                &client.object_path(),
                MODEM_INTERFACE,
                "GetIMEI",
            )
            .unwrap();
        assert_eq!(
            reply,
            vec![BusValue::Int(0), BusValue::Str("356938035643809".to_string())]
        );
    }

    #[test]
    fn snapshot_parses_from_json() {
        let snapshot = DaemonSnapshot::from_json_str(
            r#"{
                "modems": [{
                    "cp_name": "modem0",
                    "calls": [{"call_type": "e911", "state": "dialing"}],
                    "network": {"service_type": "2.5g_edge", "plmn": "45005"},
                    "denied": ["imei"]
                }]
            }"#,
        )
        .unwrap();
        let modem = &snapshot.modems[0];
        assert_eq!(modem.calls[0].call_type, CallType::E911);
        assert_eq!(modem.network.service_type, Some(ServiceType::Gen2_5Edge));
        assert_eq!(modem.denied, vec![Operation::Imei]);
    }
}
