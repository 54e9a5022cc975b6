use domain::{AttrMap, AttrValue, device_name};
use signage_storage::{DeviceRecord, DeviceStore, HeartbeatUpdate, InMemoryDeviceStore};

fn register(device_id: &str, site: &str, location: &str) -> DeviceRecord {
    DeviceRecord::registered(
        device_id,
        site,
        location,
        device_name(site, location),
        true,
        50,
        true,
    )
}

fn heartbeat(is_playing: bool, current_media: Option<&str>) -> HeartbeatUpdate {
    HeartbeatUpdate {
        is_online: true,
        is_playing,
        current_media: current_media.map(str::to_string),
        ip_address: None,
        mac_address: None,
        system_info: None,
    }
}

#[tokio::test]
async fn create_rejects_duplicate_name() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");
    let err = store
        .create_device(register("dev-2", "acme", "lobby"))
        .await
        .expect_err("duplicate name");
    assert!(err.is_conflict());
}

#[tokio::test]
async fn heartbeat_sets_online_and_last_seen() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");

    let updated = store
        .record_heartbeat("acme-lobby", heartbeat(true, Some("a.mp4")), 1_000)
        .await
        .expect("heartbeat")
        .expect("device exists");

    assert!(updated.is_online);
    assert!(updated.is_playing);
    assert_eq!(updated.current_media.as_deref(), Some("a.mp4"));
    assert_eq!(updated.last_seen_at_ms, Some(1_000));
}

#[tokio::test]
async fn heartbeat_unknown_device_creates_nothing() {
    let store = InMemoryDeviceStore::new();
    let result = store
        .record_heartbeat("acme-lobby", heartbeat(false, None), 1_000)
        .await
        .expect("heartbeat");
    assert!(result.is_none());
    assert!(store.list_devices(None).await.expect("list").is_empty());
}

#[tokio::test]
async fn heartbeat_preserves_absent_telemetry() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");

    let mut first = heartbeat(false, None);
    first.ip_address = Some("10.0.0.12".to_string());
    first.mac_address = Some("b8:27:eb:00:00:01".to_string());
    store
        .record_heartbeat("acme-lobby", first, 1_000)
        .await
        .expect("heartbeat")
        .expect("device exists");

    // 第二次心跳不带 ip/mac：旧值保留，状态字段照常覆盖
    let updated = store
        .record_heartbeat("acme-lobby", heartbeat(true, Some("b.png")), 2_000)
        .await
        .expect("heartbeat")
        .expect("device exists");

    assert_eq!(updated.ip_address.as_deref(), Some("10.0.0.12"));
    assert_eq!(updated.mac_address.as_deref(), Some("b8:27:eb:00:00:01"));
    assert_eq!(updated.current_media.as_deref(), Some("b.png"));
    assert_eq!(updated.last_seen_at_ms, Some(2_000));
}

#[tokio::test]
async fn later_heartbeat_wins_without_merge() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");

    store
        .record_heartbeat("acme-lobby", heartbeat(true, Some("a.mp4")), 1_000)
        .await
        .expect("heartbeat");
    let updated = store
        .record_heartbeat("acme-lobby", heartbeat(true, Some("c.jpg")), 1_500)
        .await
        .expect("heartbeat")
        .expect("device exists");

    assert_eq!(updated.current_media.as_deref(), Some("c.jpg"));
}

#[tokio::test]
async fn sweep_flips_stale_online_devices() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");
    store
        .create_device(register("dev-2", "acme", "hall"))
        .await
        .expect("create");

    store
        .record_heartbeat("acme-lobby", heartbeat(true, Some("a.mp4")), 1_000)
        .await
        .expect("heartbeat");
    store
        .record_heartbeat("acme-hall", heartbeat(true, None), 600_000)
        .await
        .expect("heartbeat");

    let swept = store.sweep_offline(500_000).await.expect("sweep");
    assert_eq!(swept, vec!["acme-lobby".to_string()]);

    let stale = store
        .find_by_name("acme-lobby")
        .await
        .expect("find")
        .expect("exists");
    assert!(!stale.is_online);
    assert!(!stale.is_playing);

    let fresh = store
        .find_by_name("acme-hall")
        .await
        .expect("find")
        .expect("exists");
    assert!(fresh.is_online);
}

#[tokio::test]
async fn sweep_ignores_already_offline_devices() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");
    // 从未上线：不应出现在清扫结果里
    let swept = store.sweep_offline(500_000).await.expect("sweep");
    assert!(swept.is_empty());
}

#[tokio::test]
async fn pending_action_accumulates() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "acme", "lobby"))
        .await
        .expect("create");

    store
        .append_pending_action("dev-1", "reboot", None)
        .await
        .expect("append")
        .expect("device exists");
    let mut params = AttrMap::new();
    params.insert("volume".to_string(), AttrValue::Number(80.0));
    let updated = store
        .append_pending_action("dev-1", "set_volume", Some(params))
        .await
        .expect("append")
        .expect("device exists");

    assert_eq!(
        updated.pending_actions.get("reboot"),
        Some(&AttrValue::Bool(true))
    );
    assert!(matches!(
        updated.pending_actions.get("set_volume"),
        Some(AttrValue::Map(_))
    ));
}

#[tokio::test]
async fn stats_count_by_site() {
    let store = InMemoryDeviceStore::new();
    store
        .create_device(register("dev-1", "site-1", "lobby"))
        .await
        .expect("create");
    store
        .create_device(register("dev-2", "site-1", "hall"))
        .await
        .expect("create");
    store
        .create_device(register("dev-3", "site-2", "lobby"))
        .await
        .expect("create");
    store
        .record_heartbeat("site-1-lobby", heartbeat(true, None), 1_000)
        .await
        .expect("heartbeat");

    let all = store.device_stats(None).await.expect("stats");
    assert_eq!(all.total, 3);
    assert_eq!(all.online, 1);
    assert_eq!(all.offline, 2);
    assert_eq!(all.playing, 1);

    let scoped = store.device_stats(Some("site-1")).await.expect("stats");
    assert_eq!(scoped.total, 2);
    assert_eq!(scoped.online, 1);
}
