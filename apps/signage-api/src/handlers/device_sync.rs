//! 设备同步协议 handlers（设备侧，无认证）
//!
//! Raspberry Pi 轮询的三个端点：
//! - GET /api/devices/sync - 拉取播放配置与待执行动作（只读）
//! - POST /api/devices/heartbeat - 上报存活与播放状态
//! - GET /api/devices/download/{site}/{location}/{filename} - 下载媒体文件
//!
//! 协议约定：
//! - 设备以 `{site}-{location}` 组合名定位，未注册不做 upsert
//! - 禁用设备 sync 返回最小负载（继续轮询，停止播放）
//! - 下载对「设备未注册」与「设备被禁用」统一返回 403，
//!   不向未认证调用方泄露设备是否存在
//! - 同一设备的并发心跳为后提交者胜出，无字段合并

use crate::AppState;
use crate::utils::response::{
    forbidden_error, media_error, not_found_error, storage_error,
};
use api_contract::{DeviceStatusReport, HeartbeatResponse, SyncResponse};
use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::device_name;
use signage_media::MediaError;
use signage_storage::HeartbeatUpdate;
use signage_telemetry::{record_heartbeat, record_media_download, record_sync_request};
use std::net::SocketAddr;

#[derive(serde::Deserialize)]
pub struct DeviceKeyQuery {
    site: String,
    location: String,
}

/// 拉取配置
///
/// 只读：播放列表来自设备目录下已生成的 playlist.txt（缺失视为空），
/// 本端点不触发重建。
pub async fn sync_device(
    State(state): State<AppState>,
    Query(query): Query<DeviceKeyQuery>,
) -> Response {
    record_sync_request();
    let name = device_name(&query.site, &query.location);
    let device = match state.device_store.find_by_name(&name).await {
        Ok(Some(device)) => device,
        Ok(None) => return not_found_error("device not registered"),
        Err(err) => return storage_error(err),
    };
    if !device.enabled {
        return (StatusCode::OK, Json(SyncResponse::disabled(name))).into_response();
    }
    let playlist = match state.media.read_playlist(&query.site, &query.location).await {
        Ok(playlist) => playlist,
        Err(err) => return media_error(err),
    };
    let response = SyncResponse {
        device: name,
        enabled: true,
        message: None,
        playlist: Some(playlist),
        volume: Some(device.volume),
        screen_on: Some(device.screen_on),
        schedule: device.schedule,
        pending_actions: Some(device.pending_actions),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 心跳上报
///
/// 状态字段无条件覆盖并刷新 last_seen；ip/mac/system_info
/// 仅在上报非空时覆盖，ip 缺省回填请求来源地址。
pub async fn device_heartbeat(
    State(state): State<AppState>,
    Query(query): Query<DeviceKeyQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(report): Json<DeviceStatusReport>,
) -> Response {
    record_heartbeat();
    let name = device_name(&query.site, &query.location);
    let ip_address = report
        .ip_address
        .filter(|value| !value.is_empty())
        .or_else(|| Some(addr.ip().to_string()));
    let update = HeartbeatUpdate {
        is_online: report.is_online,
        is_playing: report.is_playing,
        current_media: report.current_media,
        ip_address,
        mac_address: report.mac_address.filter(|value| !value.is_empty()),
        system_info: report.system_info.filter(|map| !map.is_empty()),
    };
    let now_ms = domain::now_epoch_ms();
    match state.device_store.record_heartbeat(&name, update, now_ms).await {
        Ok(Some(device)) => (
            StatusCode::OK,
            Json(HeartbeatResponse {
                status: "ok".to_string(),
                device: device.name,
                timestamp: device.last_seen_at_ms.unwrap_or(now_ms),
            }),
        )
            .into_response(),
        Ok(None) => not_found_error("device not registered"),
        Err(err) => storage_error(err),
    }
}

/// 下载媒体文件
pub async fn download_media(
    State(state): State<AppState>,
    Path((site, location, filename)): Path<(String, String, String)>,
) -> Response {
    let name = device_name(&site, &location);
    let device = match state.device_store.find_by_name(&name).await {
        Ok(device) => device,
        Err(err) => return storage_error(err),
    };
    // 未注册与被禁用同样处理，不泄露设备是否存在
    let allowed = device.map(|device| device.enabled).unwrap_or(false);
    if !allowed {
        return forbidden_error("access denied");
    }
    match state.media.read_device_file(&site, &location, &filename).await {
        Ok(bytes) => {
            record_media_download();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, signage_media::content_type(&filename))],
                bytes,
            )
                .into_response()
        }
        Err(MediaError::NotFound(_)) => not_found_error("file not found"),
        Err(err) => media_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::{AppState, routes::create_api_router};
    use axum::Router;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use domain::device_name;
    use http_body_util::BodyExt;
    use signage_auth::{AuthService, JwtManager};
    use signage_media::MediaLibrary;
    use signage_storage::{
        DeviceRecord, DeviceStore, InMemoryDeviceStore, InMemorySiteStore, InMemoryUserStore,
    };
    use std::net::SocketAddr;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(media_root: &Path) -> AppState {
        let user_store = Arc::new(InMemoryUserStore::new());
        AppState {
            auth: Arc::new(AuthService::new(
                user_store.clone(),
                JwtManager::new("test-secret".to_string(), 3600),
            )),
            user_store,
            site_store: Arc::new(InMemorySiteStore::new()),
            device_store: Arc::new(InMemoryDeviceStore::new()),
            media: Arc::new(MediaLibrary::new(media_root)),
        }
    }

    fn app(state: AppState) -> Router {
        create_api_router()
            .with_state(state)
            .layer(MockConnectInfo(SocketAddr::from(([192, 168, 1, 20], 50000))))
    }

    async fn seed_device(state: &AppState, enabled: bool) {
        state
            .device_store
            .create_device(DeviceRecord::registered(
                "dev-1",
                "site-1",
                "lobby",
                device_name("acme", "lobby"),
                enabled,
                50,
                true,
            ))
            .await
            .expect("seed device");
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).expect("json body")
    }

    fn sync_request() -> Request<Body> {
        Request::builder()
            .uri("/api/devices/sync?site=acme&location=lobby")
            .body(Body::empty())
            .expect("request")
    }

    fn heartbeat_request(payload: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/devices/heartbeat?site=acme&location=lobby")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn sync_unknown_device_is_404() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let app = app(test_state(media_root.path()));

        let response = app.oneshot(sync_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sync_disabled_device_returns_minimal_payload() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let state = test_state(media_root.path());
        seed_device(&state, false).await;
        let app = app(state);

        let response = app.oneshot(sync_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["device"], "acme-lobby");
        assert_eq!(value["enabled"], false);
        assert!(value.get("message").is_some());
        assert!(value.get("playlist").is_none());
        assert!(value.get("volume").is_none());
    }

    #[tokio::test]
    async fn heartbeat_then_sync_round_trip() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let device_dir = media_root.path().join("acme").join("lobby");
        std::fs::create_dir_all(&device_dir).expect("device dir");
        std::fs::write(device_dir.join("playlist.txt"), "a.mp4\nb.png\n").expect("playlist");

        let state = test_state(media_root.path());
        seed_device(&state, true).await;
        let app = app(state.clone());

        let response = app
            .clone()
            .oneshot(heartbeat_request(serde_json::json!({
                "is_playing": true,
                "current_media": "a.mp4",
                "mac_address": "b8:27:eb:00:00:01"
            })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], "ok");
        assert_eq!(value["device"], "acme-lobby");
        assert!(value["timestamp"].is_i64());

        let device = state
            .device_store
            .find_by_name("acme-lobby")
            .await
            .expect("find")
            .expect("exists");
        assert!(device.is_online);
        assert!(device.is_playing);
        // 设备未上报 ip：回填请求来源地址
        assert_eq!(device.ip_address.as_deref(), Some("192.168.1.20"));
        assert_eq!(device.mac_address.as_deref(), Some("b8:27:eb:00:00:01"));

        let response = app.oneshot(sync_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["enabled"], true);
        assert_eq!(value["playlist"], serde_json::json!(["a.mp4", "b.png"]));
        assert_eq!(value["volume"], 50);
        assert_eq!(value["screen_on"], true);
        assert_eq!(value["pending_actions"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn sync_is_idempotent_without_state_change() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let state = test_state(media_root.path());
        seed_device(&state, true).await;
        let app = app(state);

        let first = app.clone().oneshot(sync_request()).await.expect("response");
        let second = app.oneshot(sync_request()).await.expect("response");
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[tokio::test]
    async fn heartbeat_unknown_device_is_404_without_upsert() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let state = test_state(media_root.path());
        let app = app(state.clone());

        let response = app
            .oneshot(heartbeat_request(serde_json::json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(
            state
                .device_store
                .list_devices(None)
                .await
                .expect("list")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn download_is_forbidden_for_unknown_and_disabled_devices() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let state = test_state(media_root.path());
        let app = app(state.clone());

        // 未注册
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/devices/download/acme/lobby/a.mp4")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // 已注册但禁用：同样 403
        seed_device(&state, false).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices/download/acme/lobby/a.mp4")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn download_serves_file_bytes_for_enabled_device() {
        let media_root = tempfile::tempdir().expect("tempdir");
        let device_dir = media_root.path().join("acme").join("lobby");
        std::fs::create_dir_all(&device_dir).expect("device dir");
        std::fs::write(device_dir.join("a.mp4"), b"video-bytes").expect("media file");

        let state = test_state(media_root.path());
        seed_device(&state, true).await;
        let app = app(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/devices/download/acme/lobby/a.mp4")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("video/mp4")
        );
        assert_eq!(body_bytes(response).await, b"video-bytes");

        // 文件缺失 → 404
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices/download/acme/lobby/ghost.mp4")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
