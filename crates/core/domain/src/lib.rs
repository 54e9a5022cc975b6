pub mod attr;

pub use attr::{AttrMap, AttrValue};

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// 管理端用户角色（封闭枚举，带显式排序）。
///
/// `SuperAdmin > Admin`：角色门控统一走 [`Role::at_least`]，
/// 不做字符串比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    /// 存储/线上的角色编码。
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// 判断当前角色是否满足最低角色要求。
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知角色编码。
#[derive(Debug)]
pub struct UnknownRole(pub String);

impl std::fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// 用户上下文：管理端请求共享的执行上下文。
///
/// `site_id` 为站点管理员的作用域；superadmin 不绑定站点。
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub site_id: Option<String>,
}

impl UserContext {
    /// 构造显式身份与角色的用户上下文。
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        site_id: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
            site_id,
        }
    }
}

/// 设备名：`{site}-{location}` 复合键的唯一物化点。
///
/// 注册与按名查找必须经由同一函数，保证键的构造一致。
pub fn device_name(site: &str, location: &str) -> String {
    format!("{site}-{location}")
}

/// 当前时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
