//! Contract with the platform telephony daemon (TAPI)
//!
//! The daemon owns all telephony state. This module only describes how it is
//! reached:
//!
//! ```text
//! ┌────────────────┐  cp_name_list / connect   ┌────────────────┐
//! │ TapiConnector  │──────────────────────────▶│  TapiClient    │ one per modem
//! └────────────────┘                           │  typed calls   │
//!                                              │  events        │
//!                                              │  bus() ────────┼──▶ BusConnection
//!                                              └────────────────┘     (direct method calls)
//! ```
//!
//! Bus transport, session management and event delivery threads live on the
//! far side of these traits. [`memory::MemoryDaemon`] is an in-process
//! implementation used by the tests, the probe CLI and the C ABI's default
//! runtime.

pub mod error;
pub mod memory;
pub mod types;

use std::sync::Arc;

pub use error::{BusError, TapiError};
pub use types::{BusValue, CallStatus, CallSubState, CallType, EventPayload, Property, ServiceType};

/// Well-known bus name of the daemon.
pub const TELEPHONY_SERVICE: &str = "org.tizen.telephony";
/// Interface carrying modem methods such as `GetIMEI`.
pub const MODEM_INTERFACE: &str = "org.tizen.telephony.Modem";
/// Prefix of every per-modem object path.
pub const OBJECT_PATH_PREFIX: &str = "/org/tizen/telephony";

/// Object path of the modem called `cp_name`.
pub fn object_path(cp_name: &str) -> String {
    format!("{}/{}", OBJECT_PATH_PREFIX, cp_name)
}

/// Receives daemon events registered through [`TapiClient::register_event`].
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &str, payload: &EventPayload);
}

/// Direct request/response access to the daemon's bus objects.
pub trait BusConnection: Send + Sync {
    /// Call `method` on `interface` at `path` of `service` without arguments
    /// and block for the reply tuple.
    fn call_sync(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Vec<BusValue>, BusError>;
}

/// Typed client bound to one modem of the daemon.
pub trait TapiClient: Send + Sync {
    /// Name of the modem this client talks to.
    fn cp_name(&self) -> &str;

    /// Bus object path of the modem.
    fn object_path(&self) -> String {
        object_path(self.cp_name())
    }

    /// Every call record the daemon currently knows about.
    fn call_status_all(&self) -> Result<Vec<CallStatus>, TapiError>;

    fn property_int(&self, property: Property) -> Result<i32, TapiError>;

    fn property_string(&self, property: Property) -> Result<String, TapiError>;

    /// Raw bus connection shared with the typed client.
    fn bus(&self) -> &dyn BusConnection;

    /// Ask the daemon to deliver `event` to `sink` until deregistered.
    /// Registering an event this client already registered replaces its
    /// sink. Other clients on the same modem keep their own registrations.
    fn register_event(&self, event: &str, sink: Arc<dyn EventSink>) -> Result<(), TapiError>;

    fn deregister_event(&self, event: &str) -> Result<(), TapiError>;
}

/// Discovers modems and opens clients on them.
pub trait TapiConnector: Send + Sync {
    /// Names of the modems the daemon exposes, `None` when the daemon cannot
    /// be reached.
    fn cp_name_list(&self) -> Option<Vec<String>>;

    /// Open a client on `cp_name`, `None` on failure.
    fn connect(&self, cp_name: &str) -> Option<Arc<dyn TapiClient>>;
}
