//! PostgreSQL 存储实现
//!
//! 使用 sqlx 提供类型安全的数据库访问：
//! - 所有 SQL 查询使用参数化，防止 SQL 注入
//! - JSON 值字段以序列化文本存储，serde_json 编解码
//! - 生产环境推荐使用

mod device;
mod site;
mod user;

pub use device::PgDeviceStore;
pub use site::PgSiteStore;
pub use user::PgUserStore;
