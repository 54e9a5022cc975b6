//! 认证 handlers
//!
//! - POST /api/auth/login - 登录签发 access token
//! - POST /api/auth/change-password - 修改当前用户口令
//! - GET /api/auth/me - 当前用户信息
//!
//! 登录失败统一返回 401，不区分「邮箱不存在」与「口令错误」。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    auth_error, bad_request_error, internal_auth_error, storage_error, user_to_dto,
};
use api_contract::{ChangePasswordRequest, LoginRequest, LoginResponse, LoginUser};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use signage_auth::{AuthError, hash_password, verify_password};

/// 登录：校验凭证并签发 access token
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.email, &req.password).await {
        Ok((user, tokens)) => {
            let response = LoginResponse {
                access_token: tokens.access_token,
                token_type: "bearer".to_string(),
                user: LoginUser {
                    email: user.email,
                    role: user.role.as_str().to_string(),
                    site_id: user.site_id,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(),
        Err(err) => internal_auth_error(err),
    }
}

/// 修改当前用户口令
///
/// 校验当前口令，新口令至少 8 个字符，重新哈希后落库。
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let user = match state.user_store.find_user(&ctx.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return auth_error(),
        Err(err) => return storage_error(err),
    };
    match verify_password(&user.password_hash, &req.current_password) {
        Ok(true) => {}
        Ok(false) => return bad_request_error("current password incorrect"),
        Err(err) => return internal_auth_error(err),
    }
    if req.new_password.len() < 8 {
        return bad_request_error("new password must be at least 8 characters");
    }
    let password_hash = match hash_password(&req.new_password) {
        Ok(password_hash) => password_hash,
        Err(err) => return internal_auth_error(err),
    };
    match state
        .user_store
        .update_password_hash(&ctx.user_id, &password_hash)
        .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "password_changed" })),
        )
            .into_response(),
        Ok(false) => auth_error(),
        Err(err) => storage_error(err),
    }
}

/// 当前用户信息
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.user_store.find_user(&ctx.user_id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user_to_dto(user))).into_response(),
        Ok(None) => auth_error(),
        Err(err) => storage_error(err),
    }
}
