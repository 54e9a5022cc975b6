//! # Signage Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 该模块采用分层架构，遵循以下原则：
//!
//! 1. **接口抽象层** (`traits.rs`)：定义所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型（含冲突与
//!    表缺失分类）
//! 4. **验证辅助层** (`validation.rs`)：关键标识字段校验
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **表结构引导** (`schema.rs`)：启动时幂等建表
//! 7. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 数据模型
//!
//! - **UserRecord**：管理端用户（user_id, email, password_hash, role, site_id）
//! - **SiteRecord**：站点（site_id, name, address）
//! - **DeviceRecord**：展示设备（身份三元组 + 播放配置 + 存活状态 +
//!   上报信息 + 待执行动作）
//!
//! ## 设备同步相关约定
//!
//! - 设备名 `{site}-{location}` 全局唯一，按名查找与注册共用同一构造
//! - `record_heartbeat` 不做 upsert：未知设备返回 None
//! - `sweep_offline` 单向翻转 online → offline，永不反向
//! - 同一设备的并发心跳为后提交者胜出，无版本号、无字段合并
//!
//! ## 设计约束
//!
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//! - **参数化查询**：所有 SQL 使用参数绑定，防止 SQL 注入
//! - **连接池**：PostgreSQL 连接池最大连接数为 8，可根据负载调整

// 模块导出：将子模块的内容导出到 crate 根目录
pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod traits;
pub mod validation;

// 导出常用类型到 crate 根目录，方便外部引用
pub use connection::*;
pub use error::*;
pub use models::*;
pub use schema::*;
pub use traits::*;
pub use validation::*;

// 导出内存存储实现类型
pub use in_memory::{InMemoryDeviceStore, InMemorySiteStore, InMemoryUserStore};

// 导出 PostgreSQL 存储实现类型
pub use postgres::{PgDeviceStore, PgSiteStore, PgUserStore};
