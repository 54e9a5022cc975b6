//! 站点 CRUD handlers
//!
//! - GET /api/sites - 列出站点（任意已认证用户）
//! - POST /api/sites - 创建站点（仅 superadmin）
//! - GET /api/sites/{id} - 站点详情
//! - PUT /api/sites/{id} - 更新站点（仅 superadmin）
//! - DELETE /api/sites/{id} - 删除站点（仅 superadmin）
//!
//! 站点名全局唯一，重复创建返回 409。

use crate::AppState;
use crate::middleware::{require_role, require_user};
use crate::utils::response::{not_found_error, site_to_dto, storage_error};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{CreateSiteRequest, SiteDto, UpdateSiteRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::Role;
use signage_storage::{SiteRecord, SiteUpdate};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct SitePath {
    site_id: String,
}

/// 列出站点
pub async fn list_sites(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    match state.site_store.list_sites().await {
        Ok(items) => {
            let data: Vec<SiteDto> = items.into_iter().map(site_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 站点详情
pub async fn get_site(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    match state.site_store.find_site(&path.site_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(site_to_dto(item))).into_response(),
        Ok(None) => not_found_error("site not found"),
        Err(err) => storage_error(err),
    }
}

/// 创建站点（仅 superadmin）
pub async fn create_site(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSiteRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let address = match normalize_required(req.address, "address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = SiteRecord {
        site_id: Uuid::new_v4().to_string(),
        name,
        address,
    };
    match state.site_store.create_site(record).await {
        Ok(item) => (StatusCode::OK, Json(site_to_dto(item))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 更新站点（仅 superadmin）
pub async fn update_site(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
    Json(req): Json<UpdateSiteRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let address = match normalize_optional(req.address, "address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = SiteUpdate { name, address };
    match state.site_store.update_site(&path.site_id, update).await {
        Ok(Some(item)) => (StatusCode::OK, Json(site_to_dto(item))).into_response(),
        Ok(None) => not_found_error("site not found"),
        Err(err) => storage_error(err),
    }
}

/// 删除站点（仅 superadmin）
pub async fn delete_site(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    match state.site_store.delete_site(&path.site_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted" })),
        )
            .into_response(),
        Ok(false) => not_found_error("site not found"),
        Err(err) => storage_error(err),
    }
}
