//! # Telephony Core
//!
//! Call, modem and network information read from the platform telephony
//! daemon (TAPI). The daemon owns all telephony state; this crate validates
//! the request, checks that telephony exists on the device, performs one
//! daemon request and maps the answer into a small set of public types.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use telephony_core::tapi::memory::{MemoryDaemon, ModemSnapshot};
//! use telephony_core::tapi::{CallStatus, CallSubState, CallType};
//! use telephony_core::{CallState, StaticFeatures};
//!
//! let mut modem = ModemSnapshot::new("modem0");
//! modem.calls.push(CallStatus::new(1, CallType::Voice, CallSubState::Active));
//! let daemon = MemoryDaemon::single(modem);
//!
//! let handles = telephony_core::init(&daemon, Arc::new(StaticFeatures::telephony(true))).unwrap();
//! let handle = &handles.handles()[0];
//! assert_eq!(handle.voice_call_state().unwrap(), CallState::Connected);
//! handles.deinit().unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! TelephonyHandle ──▶ feature gate ──▶ TapiClient / BusConnection ──▶ daemon
//!        │                                      │
//!        └── notification registry ◀── EventSink ◀─ daemon events
//! ```

pub mod call;
pub mod config;
pub mod error;
pub mod feature;
pub mod handle;
pub mod logging;
pub mod modem;
pub mod network;
pub mod notification;
pub mod tapi;

pub use call::{aggregate_call_state, CallFamily, CallState};
pub use config::{ConfigError, TelephonyConfig};
pub use error::{Result, TelephonyError};
pub use feature::{FeatureSource, StaticFeatures, TELEPHONY_FEATURE};
pub use handle::{init, HandleList, TelephonyHandle};
pub use network::{NetworkType, Rssi, ServiceState};
pub use notification::{Notification, NotificationId, NotificationValue};
