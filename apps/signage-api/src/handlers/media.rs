//! 媒体管理 handlers（admin+）
//!
//! - POST /api/media/upload - 上传站点媒体文件（multipart）
//! - GET /api/media/list - 列出站点媒体文件
//! - DELETE /api/media/delete - 删除站点媒体文件
//! - POST /api/media/playlist - 重建站点播放列表
//!
//! 上传默认不覆盖同名文件（`replace=true` 显式替换，否则 409）。

use crate::AppState;
use crate::middleware::{require_role, require_user};
use crate::utils::response::{bad_request_error, media_error};
use api_contract::{MediaFileDto, MediaListResponse, PlaylistResponse, UploadResponse};
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::Role;
use signage_telemetry::{record_media_upload, record_playlist_rebuild};

#[derive(serde::Deserialize)]
pub struct SiteQuery {
    site_name: String,
}

#[derive(serde::Deserialize)]
pub struct DeleteQuery {
    site_name: String,
    filename: String,
}

/// 上传站点媒体文件
pub async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }

    let mut site_name: Option<String> = None;
    let mut replace = false;
    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request_error("invalid multipart payload"),
        };
        // 先取出字段名，field.text()/bytes() 会消费 field 本体
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("site_name") => match field.text().await {
                Ok(value) => site_name = Some(value),
                Err(_) => return bad_request_error("invalid site_name field"),
            },
            Some("replace") => match field.text().await {
                Ok(value) => {
                    replace = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on");
                }
                Err(_) => return bad_request_error("invalid replace field"),
            },
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        let Some(filename) = filename else {
                            return bad_request_error("file field requires a filename");
                        };
                        file = Some((filename, bytes.to_vec()));
                    }
                    Err(_) => return bad_request_error("invalid file field"),
                }
            }
            _ => {}
        }
    }
    let Some(site_name) = site_name else {
        return bad_request_error("site_name required");
    };
    let Some((filename, bytes)) = file else {
        return bad_request_error("file required");
    };

    match state
        .media
        .save_file(&site_name, &filename, &bytes, replace)
        .await
    {
        Ok(path) => {
            record_media_upload();
            (
                StatusCode::OK,
                Json(UploadResponse {
                    status: "success".to_string(),
                    file_path: path.display().to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => media_error(err),
    }
}

/// 列出站点媒体文件
pub async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<SiteQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    match state.media.list_files(&query.site_name).await {
        Ok(files) => {
            let files = files
                .into_iter()
                .map(|filename| MediaFileDto {
                    filename,
                    site_name: query.site_name.clone(),
                })
                .collect();
            (StatusCode::OK, Json(MediaListResponse { files })).into_response()
        }
        Err(err) => media_error(err),
    }
}

/// 删除站点媒体文件
pub async fn delete_media(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    match state
        .media
        .delete_file(&query.site_name, &query.filename)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted", "file": query.filename })),
        )
            .into_response(),
        Err(err) => media_error(err),
    }
}

/// 重建站点播放列表（带外触发；设备 sync 只读现有文件）
pub async fn rebuild_playlist(
    State(state): State<AppState>,
    Query(query): Query<SiteQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_role(&ctx, Role::Admin) {
        return response;
    }
    match state.media.build_playlist(&query.site_name).await {
        Ok(entries) => {
            record_playlist_rebuild();
            (
                StatusCode::OK,
                Json(PlaylistResponse {
                    status: "ok".to_string(),
                    site_name: query.site_name,
                    entries,
                }),
            )
                .into_response()
        }
        Err(err) => media_error(err),
    }
}
