//! Digital signage 管理后端入口。
//!
//! 启动流程：加载配置 → 初始化日志 → 建立连接池并幂等建表 →
//! 引导默认 superadmin → 启动离线监测后台任务 → 挂载路由并监听。
//!
//! 运行时只有两类执行单元：每请求一个 handler 调用，
//! 加上唯一的离线监测任务；两者只通过存储接口共享状态。

mod handlers;
mod middleware;
mod monitor;
mod routes;
mod utils;

use signage_auth::{AuthService, JwtManager, hash_password};
use signage_config::AppConfig;
use signage_media::MediaLibrary;
use signage_storage::{
    DeviceStore, PgDeviceStore, PgSiteStore, PgUserStore, SiteStore, UserRecord, UserStore,
};
use signage_telemetry::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 应用状态：handler 共享的存储与服务句柄。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub user_store: Arc<dyn UserStore>,
    pub site_store: Arc<dyn SiteStore>,
    pub device_store: Arc<dyn DeviceStore>,
    pub media: Arc<MediaLibrary>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let pool = signage_storage::connect_pool(&config.database_url).await?;
    // 幂等建表；失败只记日志，离线监测会容忍表缺失的窗口期
    if let Err(err) = signage_storage::create_schema(&pool).await {
        error!(error = %err, "schema_bootstrap_failed");
    }

    let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let site_store: Arc<dyn SiteStore> = Arc::new(PgSiteStore::new(pool.clone()));
    let device_store: Arc<dyn DeviceStore> = Arc::new(PgDeviceStore::new(pool));

    bootstrap_superadmin(&config, user_store.as_ref()).await;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_ttl_seconds);
    let auth = Arc::new(AuthService::new(user_store.clone(), jwt));
    let media = Arc::new(MediaLibrary::new(&config.media_root));

    let state = AppState {
        auth,
        user_store,
        site_store,
        device_store,
        media,
    };

    // 离线监测后台任务：只持有设备注册表句柄，不共享可变全局
    tokio::spawn(monitor::run_offline_monitor(
        state.device_store.clone(),
        monitor::MonitorSettings {
            interval: Duration::from_secs(config.monitor_interval_seconds),
            offline_after: Duration::from_secs(config.offline_after_seconds),
        },
    ));

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "signage_api_listening");
    // 心跳需要请求来源地址作为 ip_address 的兜底
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// 引导默认 superadmin。
///
/// 凭证未配置或已存在 superadmin 时跳过；任何失败只记日志，
/// 不阻塞启动。
async fn bootstrap_superadmin(config: &AppConfig, user_store: &dyn UserStore) {
    let (Some(email), Some(password)) = (
        config.superadmin_email.as_deref(),
        config.superadmin_password.as_deref(),
    ) else {
        warn!("superadmin credentials not configured, skipping bootstrap");
        return;
    };
    if password.len() < 8 {
        error!("superadmin password must be at least 8 characters, skipping bootstrap");
        return;
    }
    match user_store.has_superadmin().await {
        Ok(true) => {
            info!("superadmin already present");
            return;
        }
        Ok(false) => {}
        Err(err) => {
            error!(error = %err, "superadmin lookup failed");
            return;
        }
    }
    let password_hash = match hash_password(password) {
        Ok(password_hash) => password_hash,
        Err(err) => {
            error!(error = %err, "superadmin password hash failed");
            return;
        }
    };
    let record = UserRecord {
        user_id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash,
        role: domain::Role::SuperAdmin,
        site_id: None,
    };
    match user_store.create_user(record).await {
        Ok(user) => info!(email = %user.email, "superadmin_created"),
        Err(err) => error!(error = %err, "superadmin bootstrap failed"),
    }
}
