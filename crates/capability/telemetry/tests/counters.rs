use signage_telemetry::{metrics, record_devices_marked_offline, record_heartbeat};

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_heartbeat();
    record_devices_marked_offline(3);
    let after = metrics().snapshot();

    assert_eq!(after.heartbeats, before.heartbeats + 1);
    assert_eq!(after.devices_marked_offline, before.devices_marked_offline + 3);
}
