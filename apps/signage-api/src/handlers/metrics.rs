//! 健康检查与指标快照 handlers

use crate::AppState;
use crate::middleware::{require_role, require_user};
use crate::utils::response::metrics_to_dto;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::Role;
use signage_telemetry::metrics;

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 进程内计数器快照（admin+）
pub async fn metrics_snapshot(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    (StatusCode::OK, Json(metrics_to_dto(metrics().snapshot()))).into_response()
}
