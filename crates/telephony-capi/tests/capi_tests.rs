//! Exercises the C entry points the way a C caller would

use std::ffi::{c_char, CStr};
use std::os::raw::{c_int, c_void};
use std::ptr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use serial_test::serial;

use capi_telephony::*;
use telephony_core::tapi::memory::{MemoryDaemon, ModemSnapshot, Operation};
use telephony_core::tapi::{CallStatus, CallSubState, CallType, EventPayload, ServiceType};
use telephony_core::StaticFeatures;

fn daemon() -> MemoryDaemon {
    let mut modem = ModemSnapshot::new("modem0");
    modem.imei = Some("490154203237518".to_string());
    modem.calls = vec![
        CallStatus::new(1, CallType::Voice, CallSubState::Active),
        CallStatus::new(2, CallType::Voice, CallSubState::Dialing),
    ];
    modem.network.lac = Some(301);
    modem.network.cell_id = Some(9001);
    modem.network.sig_level = Some(3);
    modem.network.roaming = Some(false);
    modem.network.plmn = Some("310260".to_string());
    modem.network.network_name = Some("T-Mobile".to_string());
    modem.network.service_type = Some(ServiceType::Gen3);
    MemoryDaemon::single(modem)
}

fn setup(enabled: bool) -> MemoryDaemon {
    let daemon = daemon();
    install(
        Arc::new(daemon.clone()),
        Arc::new(StaticFeatures::telephony(enabled)),
    );
    daemon
}

fn init_list() -> telephony_handle_list_s {
    let mut list = telephony_handle_list_s {
        count: 0,
        handle: ptr::null_mut(),
    };
    assert_eq!(unsafe { telephony_init(&mut list) }, TELEPHONY_ERROR_NONE);
    list
}

unsafe fn take_string(raw: *mut c_char) -> String {
    let value = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
    unsafe { libc::free(raw.cast()) };
    value
}

#[test]
#[serial]
fn test_init_and_deinit() {
    setup(true);
    let mut list = init_list();
    assert_eq!(list.count, 1);
    assert!(!list.handle.is_null());

    assert_eq!(unsafe { telephony_deinit(&mut list) }, TELEPHONY_ERROR_NONE);
    assert_eq!(list.count, 0);
    assert!(list.handle.is_null());
}

#[test]
#[serial]
fn test_null_arguments_are_invalid() {
    setup(true);
    assert_eq!(
        unsafe { telephony_init(ptr::null_mut()) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );

    let mut state = telephony_call_state_e::TELEPHONY_CALL_STATE_IDLE;
    assert_eq!(
        unsafe { telephony_call_get_voice_call_state(ptr::null_mut(), &mut state) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );

    let mut list = init_list();
    let handle = unsafe { *list.handle };
    assert_eq!(
        unsafe { telephony_call_get_voice_call_state(handle, ptr::null_mut()) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );
    assert_eq!(
        unsafe { telephony_modem_get_imei(handle, ptr::null_mut()) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );
    unsafe { telephony_deinit(&mut list) };
}

#[test]
#[serial]
fn test_feature_gate_precedes_parameter_checks() {
    setup(false);
    assert_eq!(
        unsafe { telephony_init(ptr::null_mut()) },
        TELEPHONY_ERROR_NOT_SUPPORTED
    );
    assert_eq!(
        unsafe { telephony_network_get_lac(ptr::null_mut(), ptr::null_mut()) },
        TELEPHONY_ERROR_NOT_SUPPORTED
    );
}

#[test]
#[serial]
fn test_call_and_modem() {
    let daemon = setup(true);
    let mut list = init_list();
    let handle = unsafe { *list.handle };

    let mut state = telephony_call_state_e::TELEPHONY_CALL_STATE_IDLE;
    assert_eq!(
        unsafe { telephony_call_get_voice_call_state(handle, &mut state) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(state, telephony_call_state_e::TELEPHONY_CALL_STATE_CONNECTING);

    assert_eq!(
        unsafe { telephony_call_get_video_call_state(handle, &mut state) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(state, telephony_call_state_e::TELEPHONY_CALL_STATE_IDLE);

    let mut imei: *mut c_char = ptr::null_mut();
    assert_eq!(
        unsafe { telephony_modem_get_imei(handle, &mut imei) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(unsafe { take_string(imei) }, "490154203237518");

    daemon.update_modem("modem0", |m| m.denied.push(Operation::Imei));
    let mut imei: *mut c_char = ptr::null_mut();
    assert_eq!(
        unsafe { telephony_modem_get_imei(handle, &mut imei) },
        TELEPHONY_ERROR_PERMISSION_DENIED
    );
    assert!(imei.is_null());

    unsafe { telephony_deinit(&mut list) };
}

#[test]
#[serial]
fn test_network() {
    setup(true);
    let mut list = init_list();
    let handle = unsafe { *list.handle };

    let mut value: c_int = 0;
    assert_eq!(unsafe { telephony_network_get_lac(handle, &mut value) }, TELEPHONY_ERROR_NONE);
    assert_eq!(value, 301);
    assert_eq!(
        unsafe { telephony_network_get_cell_id(handle, &mut value) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(value, 9001);

    let mut rssi = telephony_network_rssi_e::TELEPHONY_NETWORK_RSSI_0;
    assert_eq!(unsafe { telephony_network_get_rssi(handle, &mut rssi) }, TELEPHONY_ERROR_NONE);
    assert_eq!(rssi, telephony_network_rssi_e::TELEPHONY_NETWORK_RSSI_3);

    let mut roaming = true;
    assert_eq!(
        unsafe { telephony_network_get_roaming_status(handle, &mut roaming) },
        TELEPHONY_ERROR_NONE
    );
    assert!(!roaming);

    let mut text: *mut c_char = ptr::null_mut();
    assert_eq!(unsafe { telephony_network_get_mcc(handle, &mut text) }, TELEPHONY_ERROR_NONE);
    assert_eq!(unsafe { take_string(text) }, "310");
    assert_eq!(unsafe { telephony_network_get_mnc(handle, &mut text) }, TELEPHONY_ERROR_NONE);
    assert_eq!(unsafe { take_string(text) }, "260");
    assert_eq!(
        unsafe { telephony_network_get_network_name(handle, &mut text) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(unsafe { take_string(text) }, "T-Mobile");

    let mut network_type = telephony_network_type_e::TELEPHONY_NETWORK_TYPE_UNKNOWN;
    assert_eq!(
        unsafe { telephony_network_get_type(handle, &mut network_type) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(network_type, telephony_network_type_e::TELEPHONY_NETWORK_TYPE_UMTS);

    let mut service_state =
        telephony_network_service_state_e::TELEPHONY_NETWORK_SERVICE_STATE_OUT_OF_SERVICE;
    assert_eq!(
        unsafe { telephony_network_get_service_state(handle, &mut service_state) },
        TELEPHONY_ERROR_NONE
    );
    assert_eq!(
        service_state,
        telephony_network_service_state_e::TELEPHONY_NETWORK_SERVICE_STATE_IN_SERVICE
    );

    unsafe { telephony_deinit(&mut list) };
}

#[test]
#[serial]
fn test_string_with_nul_is_not_truncated() {
    let daemon = setup(true);
    daemon.update_modem("modem0", |m| {
        m.network.network_name = Some("T-Mo\0bile".to_string())
    });
    let mut list = init_list();
    let handle = unsafe { *list.handle };

    let mut text: *mut c_char = ptr::null_mut();
    assert_eq!(
        unsafe { telephony_network_get_network_name(handle, &mut text) },
        TELEPHONY_ERROR_OPERATION_FAILED
    );
    assert!(text.is_null());

    unsafe { telephony_deinit(&mut list) };
}

static LAST_NOTI: AtomicI32 = AtomicI32::new(-1);
static LAST_VALUE: AtomicI32 = AtomicI32::new(-1);

unsafe extern "C" fn record_noti(
    _handle: telephony_h,
    noti_id: c_int,
    data: *mut c_void,
    user_data: *mut c_void,
) {
    assert_eq!(user_data as usize, 0xfeed);
    LAST_NOTI.store(noti_id, Ordering::SeqCst);
    LAST_VALUE.store(unsafe { *data.cast::<c_int>() }, Ordering::SeqCst);
}

#[test]
#[serial]
fn test_notifications() {
    let daemon = setup(true);
    let mut list = init_list();
    let handle = unsafe { *list.handle };
    let user_data = 0xfeed as *mut c_void;

    assert_eq!(
        unsafe { telephony_set_noti_cb(handle, 0x7f, Some(record_noti), user_data) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );
    assert_eq!(
        unsafe { telephony_set_noti_cb(handle, TELEPHONY_NOTI_NETWORK_CELLID, None, user_data) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );
    assert_eq!(
        unsafe {
            telephony_set_noti_cb(handle, TELEPHONY_NOTI_NETWORK_CELLID, Some(record_noti), user_data)
        },
        TELEPHONY_ERROR_NONE
    );

    daemon.emit("modem0", "org.tizen.telephony.Network:cell_id", EventPayload::Int(555));
    assert_eq!(LAST_NOTI.load(Ordering::SeqCst), TELEPHONY_NOTI_NETWORK_CELLID);
    assert_eq!(LAST_VALUE.load(Ordering::SeqCst), 555);

    assert_eq!(
        unsafe { telephony_unset_noti_cb(handle, TELEPHONY_NOTI_NETWORK_CELLID) },
        TELEPHONY_ERROR_NONE
    );
    assert!(!daemon.emit("modem0", "org.tizen.telephony.Network:cell_id", EventPayload::Int(1)));
    assert_eq!(
        unsafe { telephony_unset_noti_cb(handle, TELEPHONY_NOTI_NETWORK_CELLID) },
        TELEPHONY_ERROR_INVALID_PARAMETER
    );

    unsafe { telephony_deinit(&mut list) };
}

#[test]
#[serial]
fn test_missing_daemon_fails_init() {
    reset();
    std::env::remove_var(telephony_core::config::CONFIG_ENV);
    let mut list = telephony_handle_list_s {
        count: 0,
        handle: ptr::null_mut(),
    };
    assert_eq!(
        unsafe { telephony_init(&mut list) },
        TELEPHONY_ERROR_OPERATION_FAILED
    );
    assert_eq!(list.count, 0);
    // Loading the configuration leaves the global subscriber to the host
    assert!(!tracing::dispatcher::has_been_set());
    reset();
}
