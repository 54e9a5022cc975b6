//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error,
//!   not_found_error, conflict_error, internal_auth_error,
//!   storage_error, media_error
//! - DTO 转换：user_to_dto, site_to_dto, device_to_dto, stats_to_dto
//!
//! 设计原则：
//! - 成功响应为裸 JSON 对象（线上契约）
//! - 错误响应统一为 `{"error": {"code", "message"}}`
//! - HTTP 状态码与错误码对应

use api_contract::{DeviceDto, DeviceStatsDto, ErrorBody, MetricsDto, SiteDto, UserDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use signage_auth::AuthError;
use signage_media::MediaError;
use signage_storage::{DeviceRecord, DeviceStats, SiteRecord, StorageError, UserRecord};
use signage_telemetry::MetricsSnapshot;

/// 认证错误响应（缺失或非法凭证）
pub fn auth_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("AUTH.UNAUTHORIZED", "unauthorized")),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error(message: impl Into<String>) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorBody::new("AUTH.FORBIDDEN", message.into())),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

/// 唯一键冲突错误响应
pub fn conflict_error(message: impl Into<String>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ErrorBody::new("RESOURCE.CONFLICT", message.into())),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 存储错误响应（唯一键冲突映射为 409）
pub fn storage_error(err: StorageError) -> Response {
    if err.is_conflict() {
        return conflict_error(err.to_string());
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("INTERNAL.ERROR", err.to_string())),
    )
        .into_response()
}

/// 媒体库错误响应
pub fn media_error(err: MediaError) -> Response {
    match err {
        MediaError::NotFound(_) => not_found_error(err.to_string()),
        MediaError::AlreadyExists(_) => conflict_error(err.to_string()),
        MediaError::InvalidName(_) => bad_request_error(err.to_string()),
        MediaError::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("INTERNAL.ERROR", err.to_string())),
        )
            .into_response(),
    }
}

/// UserRecord 转 UserDto
pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        user_id: record.user_id,
        email: record.email,
        role: record.role.as_str().to_string(),
        site_id: record.site_id,
    }
}

/// SiteRecord 转 SiteDto
pub fn site_to_dto(record: SiteRecord) -> SiteDto {
    SiteDto {
        site_id: record.site_id,
        name: record.name,
        address: record.address,
    }
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        device_id: record.device_id,
        site_id: record.site_id,
        location: record.location,
        name: record.name,
        enabled: record.enabled,
        volume: record.volume,
        screen_on: record.screen_on,
        schedule: record.schedule,
        is_online: record.is_online,
        is_playing: record.is_playing,
        current_media: record.current_media,
        last_seen_at_ms: record.last_seen_at_ms,
        ip_address: record.ip_address,
        mac_address: record.mac_address,
        system_info: record.system_info,
        pending_actions: record.pending_actions,
    }
}

/// DeviceStats 转 DeviceStatsDto
pub fn stats_to_dto(stats: DeviceStats) -> DeviceStatsDto {
    DeviceStatsDto {
        total: stats.total,
        online: stats.online,
        offline: stats.offline,
        playing: stats.playing,
    }
}

/// MetricsSnapshot 转 MetricsDto
pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsDto {
    MetricsDto {
        sync_requests: snapshot.sync_requests,
        heartbeats: snapshot.heartbeats,
        media_downloads: snapshot.media_downloads,
        media_uploads: snapshot.media_uploads,
        playlist_rebuilds: snapshot.playlist_rebuilds,
        devices_marked_offline: snapshot.devices_marked_offline,
        sweep_failures: snapshot.sweep_failures,
    }
}
