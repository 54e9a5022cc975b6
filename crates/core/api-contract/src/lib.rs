//! 稳定的 DTO 与 API 线上契约。
//!
//! 设备侧负载（sync/heartbeat）的字段名与形状是协议的一部分：
//! 成功响应为裸 JSON 对象（snake_case），错误响应统一为
//! `{"error": {"code", "message"}}`。

use domain::AttrMap;
use serde::{Deserialize, Serialize};

/// 失败响应体。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

/// 错误码与人类可读信息。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiError {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

// ============================================================================
// 认证
// ============================================================================

/// 登录请求体。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应中内嵌的用户信息。
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub role: String,
    pub site_id: Option<String>,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: LoginUser,
}

/// 修改口令请求体。
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// 用户
// ============================================================================

/// 用户返回结构（不含口令哈希）。
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub site_id: Option<String>,
}

/// 用户创建请求体。
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    pub site_id: Option<String>,
}

fn default_role() -> String {
    "admin".to_string()
}

/// 用户更新请求体。
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub site_id: Option<String>,
}

// ============================================================================
// 站点
// ============================================================================

/// 站点返回结构。
#[derive(Debug, Serialize)]
pub struct SiteDto {
    pub site_id: String,
    pub name: String,
    pub address: String,
}

/// 站点创建请求体。
#[derive(Debug, Deserialize)]
pub struct CreateSiteRequest {
    pub name: String,
    pub address: String,
}

/// 站点更新请求体。
#[derive(Debug, Deserialize)]
pub struct UpdateSiteRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

// ============================================================================
// 设备（管理面）
// ============================================================================

/// 设备返回结构。
#[derive(Debug, Serialize)]
pub struct DeviceDto {
    pub device_id: String,
    pub site_id: String,
    pub location: String,
    pub name: String,
    pub enabled: bool,
    pub volume: i32,
    pub screen_on: bool,
    pub schedule: Option<AttrMap>,
    pub is_online: bool,
    pub is_playing: bool,
    pub current_media: Option<String>,
    pub last_seen_at_ms: Option<i64>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub system_info: Option<AttrMap>,
    pub pending_actions: AttrMap,
}

/// 设备创建请求体。
///
/// 设备名由服务端按 `{site}-{location}` 组合，不由客户端提供。
#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub site_id: String,
    pub location: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: i32,
    #[serde(default = "default_screen_on")]
    pub screen_on: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> i32 {
    50
}

fn default_screen_on() -> bool {
    true
}

/// 设备更新请求体（身份字段不可变，不在此列）。
#[derive(Debug, Deserialize)]
pub struct UpdateDeviceRequest {
    pub enabled: Option<bool>,
    pub volume: Option<i32>,
    pub screen_on: Option<bool>,
    pub schedule: Option<AttrMap>,
}

/// 设备动作入队请求体。
#[derive(Debug, Deserialize)]
pub struct DeviceActionRequest {
    pub action: String,
    pub params: Option<AttrMap>,
}

/// 设备动作入队响应体。
#[derive(Debug, Serialize)]
pub struct DeviceActionResponse {
    pub status: String,
    pub device: String,
    pub action: String,
}

/// 设备统计。
#[derive(Debug, Serialize)]
pub struct DeviceStatsDto {
    pub total: i64,
    pub online: i64,
    pub offline: i64,
    pub playing: i64,
}

// ============================================================================
// 设备同步协议（设备侧，无认证）
// ============================================================================

/// 心跳上报体。
///
/// `ip_address` 缺省时由服务端回填请求来源地址。
#[derive(Debug, Deserialize)]
pub struct DeviceStatusReport {
    #[serde(default = "default_is_online")]
    pub is_online: bool,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub current_media: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub system_info: Option<AttrMap>,
}

fn default_is_online() -> bool {
    true
}

/// 心跳响应体。
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    pub status: String,
    pub device: String,
    pub timestamp: i64,
}

/// 同步（拉取配置）响应体。
///
/// 禁用设备只返回 `device`/`enabled`/`message` 三个键；
/// 其余键仅在启用时序列化。
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub device: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<AttrMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_actions: Option<AttrMap>,
}

impl SyncResponse {
    /// 禁用设备的最小负载：停止播放，但保持轮询。
    pub fn disabled(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            enabled: false,
            message: Some("device disabled".to_string()),
            playlist: None,
            volume: None,
            screen_on: None,
            schedule: None,
            pending_actions: None,
        }
    }
}

// ============================================================================
// 媒体
// ============================================================================

/// 媒体文件条目。
#[derive(Debug, Serialize)]
pub struct MediaFileDto {
    pub filename: String,
    pub site_name: String,
}

/// 媒体文件列表响应体。
#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub files: Vec<MediaFileDto>,
}

/// 上传响应体。
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub file_path: String,
}

/// 播放列表重建响应体。
#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub status: String,
    pub site_name: String,
    pub entries: Vec<String>,
}

// ============================================================================
// 指标
// ============================================================================

/// 进程内计数器快照。
#[derive(Debug, Serialize)]
pub struct MetricsDto {
    pub sync_requests: u64,
    pub heartbeats: u64,
    pub media_downloads: u64,
    pub media_uploads: u64,
    pub playlist_rebuilds: u64,
    pub devices_marked_offline: u64,
    pub sweep_failures: u64,
}
