//! 设备 CRUD handlers（管理面）
//!
//! 提供设备资源的增删改查接口：
//! - GET /api/devices - 列出设备（站点管理员只看本站点）
//! - POST /api/devices - 注册设备（需站点存在，名称服务端组合）
//! - GET /api/devices/statistics - 设备统计
//! - GET /api/devices/{id} - 设备详情
//! - PUT /api/devices/{id} - 更新设备配置
//! - DELETE /api/devices/{id} - 删除设备
//! - POST /api/devices/{id}/action - 入队待执行动作
//!
//! 权限要求：
//! - 所有接口需要 Bearer token 认证
//! - 变更类接口需要 admin 及以上角色
//! - 绑定站点的 admin 只能操作本站点设备

use crate::AppState;
use crate::middleware::{require_role, require_user};
use crate::utils::response::{
    bad_request_error, device_to_dto, forbidden_error, not_found_error, stats_to_dto,
    storage_error,
};
use crate::utils::normalize_required;
use api_contract::{
    CreateDeviceRequest, DeviceActionRequest, DeviceActionResponse, DeviceDto,
    UpdateDeviceRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Role, UserContext, device_name};
use signage_storage::{DeviceRecord, DeviceUpdate};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    device_id: String,
}

#[derive(serde::Deserialize)]
pub struct DeviceListQuery {
    site_id: Option<String>,
}

/// 站点管理员的有效站点过滤：绑定了站点的 admin 强制收窄到本站点
fn effective_site_filter(ctx: &UserContext, requested: Option<String>) -> Option<String> {
    if ctx.role == Role::Admin && ctx.site_id.is_some() {
        return ctx.site_id.clone();
    }
    requested
}

/// 绑定站点的 admin 是否可见该设备
fn ensure_device_scope(ctx: &UserContext, device: &DeviceRecord) -> Result<(), Response> {
    if ctx.role == Role::Admin {
        if let Some(site_id) = ctx.site_id.as_deref() {
            if site_id != device.site_id {
                return Err(forbidden_error("device outside your site"));
            }
        }
    }
    Ok(())
}

/// 列出设备
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<DeviceListQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let site_filter = effective_site_filter(&ctx, query.site_id);
    match state.device_store.list_devices(site_filter.as_deref()).await {
        Ok(items) => {
            let data: Vec<DeviceDto> = items.into_iter().map(device_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 设备统计
pub async fn device_statistics(
    State(state): State<AppState>,
    Query(query): Query<DeviceListQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let site_filter = effective_site_filter(&ctx, query.site_id);
    match state.device_store.device_stats(site_filter.as_deref()).await {
        Ok(stats) => (StatusCode::OK, Json(stats_to_dto(stats))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 设备详情
pub async fn get_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.device_store.find_device(&path.device_id).await {
        Ok(Some(item)) => {
            if let Err(response) = ensure_device_scope(&ctx, &item) {
                return response;
            }
            (StatusCode::OK, Json(device_to_dto(item))).into_response()
        }
        Ok(None) => not_found_error("device not found"),
        Err(err) => storage_error(err),
    }
}

/// 注册设备
///
/// 流程：
/// 1. 校验站点存在（设备名需要站点名参与组合）
/// 2. 组合设备名 `{site}-{location}` 并检查唯一
/// 3. 以初始状态落库（离线、未播放、无待执行动作）
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateDeviceRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    let site_id = match normalize_required(req.site_id, "site_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let location = match normalize_required(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if !(0..=100).contains(&req.volume) {
        return bad_request_error("volume must be within 0..=100");
    }
    if ctx.role == Role::Admin {
        if let Some(scope) = ctx.site_id.as_deref() {
            if scope != site_id {
                return forbidden_error("device outside your site");
            }
        }
    }
    let site = match state.site_store.find_site(&site_id).await {
        Ok(Some(site)) => site,
        Ok(None) => return bad_request_error("site not found"),
        Err(err) => return storage_error(err),
    };
    let name = device_name(&site.name, &location);
    match state.device_store.find_by_name(&name).await {
        Ok(Some(_)) => return crate::utils::response::conflict_error("device already registered"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = DeviceRecord::registered(
        Uuid::new_v4().to_string(),
        site.site_id,
        location,
        name,
        req.enabled,
        req.volume,
        req.screen_on,
    );
    match state.device_store.create_device(record).await {
        Ok(item) => (StatusCode::OK, Json(device_to_dto(item))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 更新设备配置
pub async fn update_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
    Json(req): Json<UpdateDeviceRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    if let Some(volume) = req.volume {
        if !(0..=100).contains(&volume) {
            return bad_request_error("volume must be within 0..=100");
        }
    }
    match state.device_store.find_device(&path.device_id).await {
        Ok(Some(item)) => {
            if let Err(response) = ensure_device_scope(&ctx, &item) {
                return response;
            }
        }
        Ok(None) => return not_found_error("device not found"),
        Err(err) => return storage_error(err),
    }
    let update = DeviceUpdate {
        enabled: req.enabled,
        volume: req.volume,
        screen_on: req.screen_on,
        schedule: req.schedule,
    };
    match state.device_store.update_device(&path.device_id, update).await {
        Ok(Some(item)) => (StatusCode::OK, Json(device_to_dto(item))).into_response(),
        Ok(None) => not_found_error("device not found"),
        Err(err) => storage_error(err),
    }
}

/// 删除设备
pub async fn delete_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    match state.device_store.find_device(&path.device_id).await {
        Ok(Some(item)) => {
            if let Err(response) = ensure_device_scope(&ctx, &item) {
                return response;
            }
        }
        Ok(None) => return not_found_error("device not found"),
        Err(err) => return storage_error(err),
    }
    match state.device_store.delete_device(&path.device_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted" })),
        )
            .into_response(),
        Ok(false) => not_found_error("device not found"),
        Err(err) => storage_error(err),
    }
}

/// 入队待执行动作
///
/// 动作只累积不清除：设备通过 sync 拉到 pending_actions，
/// 目前没有回执/清空协议。
pub async fn send_device_action(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
    Json(req): Json<DeviceActionRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    let action = match normalize_required(req.action, "action") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.device_store.find_device(&path.device_id).await {
        Ok(Some(item)) => {
            if let Err(response) = ensure_device_scope(&ctx, &item) {
                return response;
            }
        }
        Ok(None) => return not_found_error("device not found"),
        Err(err) => return storage_error(err),
    }
    match state
        .device_store
        .append_pending_action(&path.device_id, &action, req.params)
        .await
    {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(DeviceActionResponse {
                status: "queued".to_string(),
                device: item.name,
                action,
            }),
        )
            .into_response(),
        Ok(None) => not_found_error("device not found"),
        Err(err) => storage_error(err),
    }
}
