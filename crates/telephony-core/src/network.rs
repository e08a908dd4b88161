//! Registered network information
//!
//! Each getter reads one daemon property. Apart from
//! [`TelephonyHandle::service_state`], the values are only meaningful while
//! the modem is in service.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::call::map_tapi_error;
use crate::error::{Result, TelephonyError};
use crate::handle::TelephonyHandle;
use crate::tapi::{Property, ServiceType};

/// Received signal strength, `Rssi6` being the strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rssi {
    Rssi0,
    Rssi1,
    Rssi2,
    Rssi3,
    Rssi4,
    Rssi5,
    Rssi6,
}

impl Rssi {
    pub fn from_level(level: i32) -> Option<Self> {
        let rssi = match level {
            0 => Self::Rssi0,
            1 => Self::Rssi1,
            2 => Self::Rssi2,
            3 => Self::Rssi3,
            4 => Self::Rssi4,
            5 => Self::Rssi5,
            6 => Self::Rssi6,
            _ => return None,
        };
        Some(rssi)
    }

    pub fn level(self) -> i32 {
        self as i32
    }
}

/// Radio technology of the registered network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkType {
    Unknown,
    Gsm,
    Gprs,
    Edge,
    Umts,
    Hsdpa,
    Lte,
}

impl From<ServiceType> for NetworkType {
    fn from(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Gen2 => Self::Gsm,
            ServiceType::Gen2_5 => Self::Gprs,
            ServiceType::Gen2_5Edge => Self::Edge,
            ServiceType::Gen3 => Self::Umts,
            ServiceType::Hsdpa => Self::Hsdpa,
            ServiceType::Lte => Self::Lte,
            ServiceType::Unknown
            | ServiceType::NoService
            | ServiceType::Emergency
            | ServiceType::Search => Self::Unknown,
        }
    }
}

/// Whether the modem can place calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceState {
    InService,
    OutOfService,
    /// Only emergency calls are allowed
    EmergencyOnly,
}

impl From<ServiceType> for ServiceState {
    fn from(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Unknown | ServiceType::NoService | ServiceType::Search => {
                Self::OutOfService
            }
            ServiceType::Emergency => Self::EmergencyOnly,
            ServiceType::Gen2
            | ServiceType::Gen2_5
            | ServiceType::Gen2_5Edge
            | ServiceType::Gen3
            | ServiceType::Hsdpa
            | ServiceType::Lte => Self::InService,
        }
    }
}

/// MCC and MNC of a PLMN string such as `"45005"` or `"310260"`.
pub fn split_plmn(plmn: &str) -> Option<(&str, &str)> {
    if plmn.len() < 4 || plmn.len() > 6 || !plmn.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(plmn.split_at(3))
}

impl TelephonyHandle {
    fn read_int(&self, property: Property) -> Result<i32> {
        let client = self.prepare()?;
        debug!("Reading {} on {}", property.name(), client.cp_name());
        client.property_int(property).map_err(map_tapi_error)
    }

    fn read_string(&self, property: Property) -> Result<String> {
        let client = self.prepare()?;
        debug!("Reading {} on {}", property.name(), client.cp_name());
        client.property_string(property).map_err(map_tapi_error)
    }

    fn plmn(&self) -> Result<(String, String)> {
        let plmn = self.read_string(Property::Plmn)?;
        match split_plmn(&plmn) {
            Some((mcc, mnc)) => Ok((mcc.to_string(), mnc.to_string())),
            None => {
                error!("OPERATION_FAILED: malformed PLMN '{}'", plmn);
                Err(TelephonyError::operation_failed(format!(
                    "malformed PLMN '{}'",
                    plmn
                )))
            }
        }
    }

    /// Location area code.
    pub fn lac(&self) -> Result<i32> {
        let lac = self.read_int(Property::Lac)?;
        info!("lac: [{}]", lac);
        Ok(lac)
    }

    pub fn cell_id(&self) -> Result<i32> {
        let cell_id = self.read_int(Property::CellId)?;
        info!("cell_id: [{}]", cell_id);
        Ok(cell_id)
    }

    pub fn rssi(&self) -> Result<Rssi> {
        let level = self.read_int(Property::SignalStrengthLevel)?;
        info!("rssi: [{}]", level);
        Rssi::from_level(level).ok_or_else(|| {
            error!("OPERATION_FAILED: signal level {} out of range", level);
            TelephonyError::operation_failed(format!("signal level {} out of range", level))
        })
    }

    pub fn roaming_status(&self) -> Result<bool> {
        let roaming = self.read_int(Property::RoamingStatus)? != 0;
        info!("roaming_status: [{}]", roaming);
        Ok(roaming)
    }

    /// Mobile country code, three digits.
    pub fn mcc(&self) -> Result<String> {
        let (mcc, _) = self.plmn()?;
        info!("mcc: [{}]", mcc);
        Ok(mcc)
    }

    /// Mobile network code, two or three digits.
    pub fn mnc(&self) -> Result<String> {
        let (_, mnc) = self.plmn()?;
        info!("mnc: [{}]", mnc);
        Ok(mnc)
    }

    pub fn network_name(&self) -> Result<String> {
        let name = self.read_string(Property::NetworkName)?;
        info!("network_name: [{}]", name);
        Ok(name)
    }

    pub fn network_type(&self) -> Result<NetworkType> {
        let service_type = ServiceType::from_raw(self.read_int(Property::ServiceType)?);
        let network_type = NetworkType::from(service_type);
        info!("network_type: [{:?}]", network_type);
        Ok(network_type)
    }

    pub fn service_state(&self) -> Result<ServiceState> {
        let service_type = ServiceType::from_raw(self.read_int(Property::ServiceType)?);
        let state = ServiceState::from(service_type);
        info!("network_service_state: [{:?}]", state);
        Ok(state)
    }
}
