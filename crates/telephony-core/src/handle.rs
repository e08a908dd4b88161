//! Telephony handles
//!
//! [`init`] opens one [`TelephonyHandle`] per modem the daemon exposes. A
//! handle bundles the daemon client, the feature source and the
//! notification registry; the call, modem, network and notification
//! operations are all methods on it, grouped by module.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::error::{Result, TelephonyError};
use crate::feature::{check_telephony_supported, FeatureSource};
use crate::notification::{NotificationId, Registration};
use crate::tapi::{TapiClient, TapiConnector};

/// Handle on one modem of the telephony daemon
pub struct TelephonyHandle {
    client: RwLock<Option<Arc<dyn TapiClient>>>,
    features: Arc<dyn FeatureSource>,
    /// Daemon events registered per notification id
    pub(crate) notifications: Mutex<HashMap<NotificationId, Registration>>,
}

impl std::fmt::Debug for TelephonyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelephonyHandle")
            .field("cp_name", &self.cp_name())
            .finish()
    }
}

impl TelephonyHandle {
    pub fn new(client: Arc<dyn TapiClient>, features: Arc<dyn FeatureSource>) -> Self {
        Self {
            client: RwLock::new(Some(client)),
            features,
            notifications: Mutex::new(HashMap::new()),
        }
    }

    /// Modem name, `None` once released.
    pub fn cp_name(&self) -> Option<String> {
        self.client.read().as_ref().map(|c| c.cp_name().to_string())
    }

    pub fn is_valid(&self) -> bool {
        self.client.read().is_some()
    }

    /// Feature gate followed by handle validation; the prologue of every
    /// operation.
    pub(crate) fn prepare(&self) -> Result<Arc<dyn TapiClient>> {
        check_telephony_supported(self.features.as_ref())?;
        self.client.read().clone().ok_or_else(|| {
            error!("INVALID_PARAMETER: handle has been released");
            TelephonyError::invalid_parameter("handle")
        })
    }

    /// Deregister every notification and drop the daemon client.
    pub fn release(&self) {
        let client = self.client.write().take();
        let Some(client) = client else {
            return;
        };

        let registered: Vec<_> = self.notifications.lock().drain().collect();
        for (id, registration) in registered {
            for event in registration.events {
                if let Err(e) = client.deregister_event(event) {
                    warn!("Failed to deregister {} for {:?}: {}", event, id, e);
                }
            }
        }
        debug!("Released handle on {}", client.cp_name());
    }
}

impl Drop for TelephonyHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// All handles opened by [`init`], one per modem
#[derive(Default)]
pub struct HandleList {
    handles: Vec<Arc<TelephonyHandle>>,
    features: Option<Arc<dyn FeatureSource>>,
}

impl std::fmt::Debug for HandleList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handles.iter()).finish()
    }
}

impl HandleList {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[Arc<TelephonyHandle>] {
        &self.handles
    }

    /// Take the handles out of the list; the caller becomes responsible for
    /// releasing them.
    pub fn into_handles(self) -> Vec<Arc<TelephonyHandle>> {
        self.handles
    }

    /// Release every handle.
    pub fn deinit(self) -> Result<()> {
        if let Some(features) = &self.features {
            check_telephony_supported(features.as_ref())?;
        }
        for handle in &self.handles {
            handle.release();
        }
        info!("Deinitialized {} telephony handle(s)", self.handles.len());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HandleList {
    type Item = &'a Arc<TelephonyHandle>;
    type IntoIter = std::slice::Iter<'a, Arc<TelephonyHandle>>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.iter()
    }
}

/// Open a handle on every modem the daemon exposes.
pub fn init(connector: &dyn TapiConnector, features: Arc<dyn FeatureSource>) -> Result<HandleList> {
    check_telephony_supported(features.as_ref())?;

    let Some(cp_names) = connector.cp_name_list() else {
        error!("cp_list is NULL");
        return Err(TelephonyError::operation_failed("daemon returned no modem list"));
    };

    let mut handles = Vec::with_capacity(cp_names.len());
    for cp_name in &cp_names {
        let Some(client) = connector.connect(cp_name) else {
            error!("Failed to connect to modem {}", cp_name);
            // Already opened handles are released as `handles` drops.
            return Err(TelephonyError::operation_failed(format!(
                "cannot connect to {}",
                cp_name
            )));
        };
        handles.push(Arc::new(TelephonyHandle::new(client, features.clone())));
    }

    info!("Initialized {} telephony handle(s)", handles.len());
    Ok(HandleList {
        handles,
        features: Some(features),
    })
}
