//! 用户 CRUD handlers（全部仅 superadmin）
//!
//! - GET /api/users - 列出用户
//! - POST /api/users - 创建用户
//! - GET /api/users/{id} - 用户详情
//! - PUT /api/users/{id} - 更新用户（口令重新哈希）
//! - DELETE /api/users/{id} - 删除用户
//!
//! 邮箱全局唯一，重复创建返回 409；角色必须是封闭枚举内的编码。

use crate::AppState;
use crate::middleware::{require_role, require_user};
use crate::utils::response::{
    bad_request_error, internal_auth_error, not_found_error, storage_error, user_to_dto,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{CreateUserRequest, UpdateUserRequest, UserDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::Role;
use signage_auth::hash_password;
use signage_storage::{UserRecord, UserUpdate};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct UserPath {
    user_id: String,
}

/// 列出用户
pub async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    match state.user_store.list_users().await {
        Ok(items) => {
            let data: Vec<UserDto> = items.into_iter().map(user_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 用户详情
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    match state.user_store.find_user(&path.user_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(user_to_dto(item))).into_response(),
        Ok(None) => not_found_error("user not found"),
        Err(err) => storage_error(err),
    }
}

/// 创建用户
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    let email = match normalize_required(req.email, "email") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let Ok(role) = req.role.parse::<Role>() else {
        return bad_request_error("unknown role");
    };
    let site_id = match normalize_optional(req.site_id, "site_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let password_hash = match hash_password(&req.password) {
        Ok(password_hash) => password_hash,
        Err(err) => return internal_auth_error(err),
    };
    let record = UserRecord {
        user_id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        role,
        site_id,
    };
    match state.user_store.create_user(record).await {
        Ok(item) => (StatusCode::OK, Json(user_to_dto(item))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 更新用户（给定口令时重新哈希）
pub async fn update_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    let email = match normalize_optional(req.email, "email") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let role = match req.role {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => return bad_request_error("unknown role"),
        },
        None => None,
    };
    let password_hash = match req.password {
        Some(password) => match hash_password(&password) {
            Ok(password_hash) => Some(password_hash),
            Err(err) => return internal_auth_error(err),
        },
        None => None,
    };
    let site_id = match normalize_optional(req.site_id, "site_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = UserUpdate {
        email,
        password_hash,
        role,
        site_id,
    };
    match state.user_store.update_user(&path.user_id, update).await {
        Ok(Some(item)) => (StatusCode::OK, Json(user_to_dto(item))).into_response(),
        Ok(None) => not_found_error("user not found"),
        Err(err) => storage_error(err),
    }
}

/// 删除用户
pub async fn delete_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::SuperAdmin) {
        return response;
    }
    match state.user_store.delete_user(&path.user_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted" })),
        )
            .into_response(),
        Ok(false) => not_found_error("user not found"),
        Err(err) => storage_error(err),
    }
}
