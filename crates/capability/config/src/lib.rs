//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub media_root: String,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    /// 离线监测清扫周期（秒）
    pub monitor_interval_seconds: u64,
    /// 心跳静默多久判定离线（秒）
    pub offline_after_seconds: u64,
    pub superadmin_email: Option<String>,
    pub superadmin_password: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("SIGNAGE_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("SIGNAGE_DATABASE_URL".to_string()))?;
        let jwt_secret = env::var("SIGNAGE_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("SIGNAGE_JWT_SECRET".to_string()))?;
        let jwt_access_ttl_seconds =
            read_u64_with_default("SIGNAGE_JWT_ACCESS_TTL_SECONDS", 3600)?;
        let http_addr =
            env::var("SIGNAGE_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let media_root = env::var("SIGNAGE_MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        let monitor_interval_seconds =
            read_u64_with_default("SIGNAGE_MONITOR_INTERVAL_SECONDS", 30)?;
        let offline_after_seconds = read_u64_with_default("SIGNAGE_OFFLINE_AFTER_SECONDS", 300)?;
        let superadmin_email = read_optional("SIGNAGE_SUPERADMIN_EMAIL");
        let superadmin_password = read_optional("SIGNAGE_SUPERADMIN_PASSWORD");

        Ok(Self {
            http_addr,
            database_url,
            media_root,
            jwt_secret,
            jwt_access_ttl_seconds,
            monitor_interval_seconds,
            offline_after_seconds,
            superadmin_email,
            superadmin_password,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
