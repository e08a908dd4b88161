//! Platform feature gate
//!
//! Every public operation first asks the platform whether telephony exists on
//! this device. A disabled feature short-circuits with
//! [`TelephonyError::NotSupported`]; a failed lookup with
//! [`TelephonyError::OperationFailed`].

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::error;

use crate::config::TelephonyConfig;
use crate::error::{Result, TelephonyError};

/// Platform key of the telephony feature.
pub const TELEPHONY_FEATURE: &str = "http://tizen.org/feature/network.telephony";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature lookup failed for {key}")]
pub struct FeatureLookupError {
    pub key: String,
}

/// Source of platform capability flags
pub trait FeatureSource: Send + Sync {
    fn platform_bool(&self, key: &str) -> std::result::Result<bool, FeatureLookupError>;
}

/// Fixed set of flags, typically built from [`TelephonyConfig`]. Unknown keys
/// are lookup errors.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatures {
    flags: BTreeMap<String, bool>,
}

impl StaticFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags with only the telephony feature set to `enabled`.
    pub fn telephony(enabled: bool) -> Self {
        Self::new().with(TELEPHONY_FEATURE, enabled)
    }

    pub fn with(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(key.into(), enabled);
        self
    }
}

impl From<&TelephonyConfig> for StaticFeatures {
    fn from(config: &TelephonyConfig) -> Self {
        Self {
            flags: config.features.clone(),
        }
    }
}

impl FeatureSource for StaticFeatures {
    fn platform_bool(&self, key: &str) -> std::result::Result<bool, FeatureLookupError> {
        self.flags
            .get(key)
            .copied()
            .ok_or_else(|| FeatureLookupError { key: key.to_string() })
    }
}

/// Fail unless the telephony feature is enabled.
pub fn check_telephony_supported(features: &dyn FeatureSource) -> Result<()> {
    match features.platform_bool(TELEPHONY_FEATURE) {
        Ok(true) => Ok(()),
        Ok(false) => {
            error!("telephony feature is disabled");
            Err(TelephonyError::NotSupported)
        }
        Err(e) => {
            error!("Error - Feature getting from System Info: {}", e);
            Err(TelephonyError::operation_failed(e.to_string()))
        }
    }
}
