//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore：用户存储
//! - SiteStore：站点存储
//! - DeviceStore：设备注册表
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 设备侧路径（按名查找、心跳、离线清扫）不依赖请求者身份；
//!   管理面的站点作用域由 handler 层传入过滤条件

use crate::error::StorageError;
use crate::models::{
    DeviceRecord, DeviceStats, DeviceUpdate, HeartbeatUpdate, SiteRecord, SiteUpdate, UserRecord,
    UserUpdate,
};
use async_trait::async_trait;
use domain::AttrMap;

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户 ID 查找用户
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 列出所有用户
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// 创建新用户（邮箱重复返回 conflict）
    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    /// 更新用户
    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 删除用户
    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError>;

    /// 更新口令哈希
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 是否已存在 superadmin（启动引导用）
    async fn has_superadmin(&self) -> Result<bool, StorageError>;
}

/// 站点存储接口
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// 列出所有站点
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, StorageError>;

    /// 根据站点 ID 查找站点
    async fn find_site(&self, site_id: &str) -> Result<Option<SiteRecord>, StorageError>;

    /// 根据站点名查找站点
    async fn find_by_name(&self, name: &str) -> Result<Option<SiteRecord>, StorageError>;

    /// 创建新站点（站点名重复返回 conflict）
    async fn create_site(&self, record: SiteRecord) -> Result<SiteRecord, StorageError>;

    /// 更新站点
    async fn update_site(
        &self,
        site_id: &str,
        update: SiteUpdate,
    ) -> Result<Option<SiteRecord>, StorageError>;

    /// 删除站点
    async fn delete_site(&self, site_id: &str) -> Result<bool, StorageError>;
}

/// 设备注册表接口
///
/// 同时服务管理面 CRUD 与设备同步协议（心跳、离线清扫）。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 列出设备；site_id 给定时按站点过滤
    async fn list_devices(&self, site_id: Option<&str>)
        -> Result<Vec<DeviceRecord>, StorageError>;

    /// 根据设备 ID 查找设备
    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 根据设备名（`{site}-{location}`）查找设备
    async fn find_by_name(&self, name: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 注册新设备（设备名重复返回 conflict）
    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError>;

    /// 更新设备配置（身份字段不可变）
    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 删除设备
    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError>;

    /// 写入一次心跳：按名定位，刷新状态与 last_seen。
    ///
    /// 设备不存在返回 Ok(None)，不做 upsert。
    async fn record_heartbeat(
        &self,
        name: &str,
        update: HeartbeatUpdate,
        now_ms: i64,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 向设备追加一个待执行动作（同名动作覆盖参数）
    async fn append_pending_action(
        &self,
        device_id: &str,
        action: &str,
        params: Option<AttrMap>,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 离线清扫：把 last_seen 早于 cutoff 且仍在线的设备批量置为
    /// 离线+停播，返回受影响的设备名。单向：只做 online → offline。
    async fn sweep_offline(&self, cutoff_ms: i64) -> Result<Vec<String>, StorageError>;

    /// 设备统计；site_id 给定时按站点过滤
    async fn device_stats(&self, site_id: Option<&str>) -> Result<DeviceStats, StorageError>;
}
