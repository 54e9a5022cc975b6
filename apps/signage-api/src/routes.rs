//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 认证接口：/api/auth/*
//! - 站点管理：/api/sites/*
//! - 用户管理：/api/users/*
//! - 设备管理：/api/devices/*
//! - 设备同步协议（无认证）：/api/devices/sync|heartbeat|download
//! - 媒体管理：/api/media/*
//! - 指标快照：/api/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/me", get(me))
        .route("/api/sites", get(list_sites).post(create_site))
        .route(
            "/api/sites/:site_id",
            get(get_site).put(update_site).delete(delete_site),
        )
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/devices", get(list_devices).post(create_device))
        .route("/api/devices/statistics", get(device_statistics))
        // 设备同步协议（设备侧轮询，无认证）
        .route("/api/devices/sync", get(sync_device))
        .route("/api/devices/heartbeat", post(device_heartbeat))
        .route(
            "/api/devices/download/:site/:location/:filename",
            get(download_media),
        )
        .route(
            "/api/devices/:device_id",
            get(get_device).put(update_device).delete(delete_device),
        )
        .route("/api/devices/:device_id/action", post(send_device_action))
        .route("/api/media/upload", post(upload_media))
        .route("/api/media/list", get(list_media))
        .route("/api/media/delete", delete(delete_media))
        .route("/api/media/playlist", post(rebuild_playlist))
        .route("/api/metrics", get(metrics_snapshot))
}
