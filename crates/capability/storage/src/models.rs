//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 用户模型：UserRecord, UserUpdate
//! - 站点模型：SiteRecord, SiteUpdate
//! - 设备模型：DeviceRecord, DeviceUpdate, HeartbeatUpdate, DeviceStats
//!
//! 设备的存活状态（is_online/last_seen_at_ms）直接落在设备记录上，
//! 由心跳与离线监测两条路径互斥地维护。

use domain::{AttrMap, Role, UserContext};

/// 用户记录。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub site_id: Option<String>,
}

impl UserRecord {
    /// 将用户记录转换为请求上下文。
    pub fn to_user_context(&self) -> UserContext {
        UserContext::new(
            self.user_id.clone(),
            self.email.clone(),
            self.role,
            self.site_id.clone(),
        )
    }
}

/// 用户更新输入（口令已在上层哈希）。
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub site_id: Option<String>,
}

/// 站点记录。
#[derive(Debug, Clone)]
pub struct SiteRecord {
    pub site_id: String,
    pub name: String,
    pub address: String,
}

/// 站点更新输入。
#[derive(Debug, Clone, Default)]
pub struct SiteUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// 设备记录。
///
/// 身份三元组（site_id/location/name）创建后不可变；
/// name 全局唯一，为 `{site}-{location}` 的物化。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub device_id: String,
    pub site_id: String,
    pub location: String,
    pub name: String,
    // 管理面配置
    pub enabled: bool,
    pub volume: i32,
    pub screen_on: bool,
    pub schedule: Option<AttrMap>,
    // 存活与播放状态（仅心跳与离线监测可变更）
    pub is_online: bool,
    pub is_playing: bool,
    pub current_media: Option<String>,
    pub last_seen_at_ms: Option<i64>,
    // 最近一次上报的系统信息（非空才覆盖）
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub system_info: Option<AttrMap>,
    // 待执行动作：动作名 → 参数（true 表示无参数）
    pub pending_actions: AttrMap,
}

impl DeviceRecord {
    /// 新注册设备：状态字段取初始值，等待首个心跳。
    pub fn registered(
        device_id: impl Into<String>,
        site_id: impl Into<String>,
        location: impl Into<String>,
        name: impl Into<String>,
        enabled: bool,
        volume: i32,
        screen_on: bool,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            site_id: site_id.into(),
            location: location.into(),
            name: name.into(),
            enabled,
            volume,
            screen_on,
            schedule: None,
            is_online: false,
            is_playing: false,
            current_media: None,
            last_seen_at_ms: None,
            ip_address: None,
            mac_address: None,
            system_info: None,
            pending_actions: AttrMap::new(),
        }
    }
}

/// 设备更新输入（管理面；身份字段不可变）。
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub enabled: Option<bool>,
    pub volume: Option<i32>,
    pub screen_on: Option<bool>,
    pub schedule: Option<AttrMap>,
}

/// 心跳写入。
///
/// `is_online`/`is_playing`/`current_media` 无条件覆盖；
/// 其余字段为 None 时保留旧值（上层已把空串归一为 None）。
#[derive(Debug, Clone)]
pub struct HeartbeatUpdate {
    pub is_online: bool,
    pub is_playing: bool,
    pub current_media: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub system_info: Option<AttrMap>,
}

/// 设备统计。
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStats {
    pub total: i64,
    pub online: i64,
    pub offline: i64,
    pub playing: i64,
}
