//! Modem identity

use tracing::{debug, error, info};

use crate::error::{Result, TelephonyError};
use crate::handle::TelephonyHandle;
use crate::tapi::{BusValue, MODEM_INTERFACE, TELEPHONY_SERVICE};

const GET_IMEI: &str = "GetIMEI";

impl TelephonyHandle {
    /// IMEI of the modem, read with a direct `GetIMEI` bus call.
    pub fn imei(&self) -> Result<String> {
        let client = self.prepare()?;
        let path = client.object_path();
        debug!("Calling {}.{} on {}", MODEM_INTERFACE, GET_IMEI, path);

        let reply = client
            .bus()
            .call_sync(TELEPHONY_SERVICE, &path, MODEM_INTERFACE, GET_IMEI)
            .map_err(|e| {
                error!("g_dbus_conn failed. error ({})", e.message);
                if e.is_access_denied() {
                    error!("PERMISSION_DENIED");
                    TelephonyError::PermissionDenied
                } else {
                    TelephonyError::operation_failed(e.message)
                }
            })?;

        match reply.as_slice() {
            [BusValue::Int(0), BusValue::Str(imei)] if !imei.is_empty() => {
                info!("IMEI read from {}", client.cp_name());
                Ok(imei.clone())
            }
            [BusValue::Int(0), BusValue::Str(_)] => {
                error!("OPERATION_FAILED: daemon returned an empty IMEI");
                Err(TelephonyError::operation_failed("empty IMEI"))
            }
            [BusValue::Int(result), BusValue::Str(_)] => {
                error!("OPERATION_FAILED: GetIMEI result {}", result);
                Err(TelephonyError::operation_failed(format!(
                    "GetIMEI returned {}",
                    result
                )))
            }
            other => {
                error!("OPERATION_FAILED: unexpected GetIMEI reply {:?}", other);
                Err(TelephonyError::operation_failed("malformed GetIMEI reply"))
            }
        }
    }
}
