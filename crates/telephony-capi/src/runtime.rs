//! Process-wide daemon connector and feature source
//!
//! C callers cannot pass Rust trait objects, so `telephony_init` takes the
//! connector and feature source from here. An embedding application installs
//! its own with [`install`]; otherwise the first call loads
//! [`TelephonyConfig::from_env`] and serves the configured daemon snapshot.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, error, info};

use telephony_core::feature::check_telephony_supported;
use telephony_core::tapi::memory::MemoryDaemon;
use telephony_core::tapi::TapiConnector;
use telephony_core::{FeatureSource, StaticFeatures, TelephonyConfig, TelephonyError};

/// What `telephony_init` connects through
#[derive(Clone)]
pub struct Runtime {
    pub connector: Option<Arc<dyn TapiConnector>>,
    pub features: Arc<dyn FeatureSource>,
}

static RUNTIME: Lazy<RwLock<Option<Runtime>>> = Lazy::new(|| RwLock::new(None));

/// Use `connector` and `features` for every later C call.
pub fn install(connector: Arc<dyn TapiConnector>, features: Arc<dyn FeatureSource>) {
    *RUNTIME.write() = Some(Runtime {
        connector: Some(connector),
        features,
    });
    debug!("Telephony runtime installed");
}

/// Forget the installed runtime; the next C call reloads the configuration.
pub fn reset() {
    *RUNTIME.write() = None;
}

fn load_from_config() -> Result<Runtime, TelephonyError> {
    let config = TelephonyConfig::from_env().map_err(|e| {
        error!("Failed to load telephony configuration: {}", e);
        TelephonyError::operation_failed(e.to_string())
    })?;

    let connector: Option<Arc<dyn TapiConnector>> = match &config.snapshot {
        Some(path) => {
            let daemon = MemoryDaemon::from_file(path).map_err(|e| {
                error!("Failed to load daemon snapshot: {}", e);
                TelephonyError::operation_failed(e.to_string())
            })?;
            info!("Serving daemon snapshot {}", path.display());
            Some(Arc::new(daemon))
        }
        None => None,
    };

    Ok(Runtime {
        connector,
        features: Arc::new(StaticFeatures::from(&config)),
    })
}

/// The installed runtime, loading it from configuration on first use.
pub fn current() -> Result<Runtime, TelephonyError> {
    if let Some(runtime) = RUNTIME.read().as_ref() {
        return Ok(runtime.clone());
    }

    let mut slot = RUNTIME.write();
    if let Some(runtime) = slot.as_ref() {
        return Ok(runtime.clone());
    }
    let runtime = load_from_config()?;
    *slot = Some(runtime.clone());
    Ok(runtime)
}

/// Feature gate for entry points that have no usable handle yet.
pub fn check_supported() -> Result<Runtime, TelephonyError> {
    let runtime = current()?;
    check_telephony_supported(runtime.features.as_ref())?;
    Ok(runtime)
}
