use api_contract::{DeviceStatusReport, SyncResponse};
use domain::{AttrMap, AttrValue};
use serde_json::Value;

#[test]
fn disabled_sync_payload_has_no_config_keys() {
    let response = SyncResponse::disabled("acme-lobby");
    let value = serde_json::to_value(response).expect("serialize");

    assert_eq!(value.get("device").and_then(Value::as_str), Some("acme-lobby"));
    assert_eq!(value.get("enabled").and_then(Value::as_bool), Some(false));
    assert!(value.get("message").is_some());
    assert!(value.get("playlist").is_none());
    assert!(value.get("volume").is_none());
    assert!(value.get("screen_on").is_none());
    assert!(value.get("pending_actions").is_none());
}

#[test]
fn enabled_sync_payload_serializes_config() {
    let mut pending = AttrMap::new();
    pending.insert("reboot".to_string(), AttrValue::Bool(true));
    let response = SyncResponse {
        device: "acme-lobby".to_string(),
        enabled: true,
        message: None,
        playlist: Some(vec!["a.mp4".to_string(), "b.png".to_string()]),
        volume: Some(50),
        screen_on: Some(true),
        schedule: None,
        pending_actions: Some(pending),
    };
    let value = serde_json::to_value(response).expect("serialize");

    assert_eq!(value.get("enabled").and_then(Value::as_bool), Some(true));
    assert_eq!(
        value.get("playlist").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );
    assert_eq!(
        value
            .get("pending_actions")
            .and_then(|map| map.get("reboot"))
            .and_then(Value::as_bool),
        Some(true)
    );
    assert!(value.get("message").is_none());
}

#[test]
fn status_report_defaults_is_online() {
    let report: DeviceStatusReport = serde_json::from_str("{}").expect("parse");
    assert!(report.is_online);
    assert!(!report.is_playing);
    assert!(report.current_media.is_none());
    assert!(report.ip_address.is_none());
}

#[test]
fn status_report_accepts_full_payload() {
    let payload = r#"{
        "is_online": true,
        "is_playing": true,
        "current_media": "a.mp4",
        "ip_address": "10.0.0.12",
        "mac_address": "b8:27:eb:00:00:01",
        "system_info": {"cpu_temp": 48.2, "model": "pi4"}
    }"#;
    let report: DeviceStatusReport = serde_json::from_str(payload).expect("parse");
    assert!(report.is_playing);
    assert_eq!(report.current_media.as_deref(), Some("a.mp4"));
    assert!(report.system_info.expect("system_info").contains_key("cpu_temp"));
}
