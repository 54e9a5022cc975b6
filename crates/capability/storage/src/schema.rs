//! 表结构引导
//!
//! 启动时幂等地创建所需的表（`create table if not exists`）。
//! JSON 值字段（schedule/system_info/pending_actions）以序列化文本存储，
//! 由存储层通过 serde_json 编解码。
//!
//! 离线监测不等待引导完成：引导之前的清扫周期会以
//! `schema_missing` 静默跳过。

use crate::error::StorageError;
use sqlx::PgPool;

/// 幂等创建 users/sites/devices 表。
pub async fn create_schema(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        "create table if not exists users ( \
           user_id text primary key, \
           email text not null unique, \
           password_hash text not null, \
           role text not null, \
           site_id text \
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "create table if not exists sites ( \
           site_id text primary key, \
           name text not null unique, \
           address text not null \
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "create table if not exists devices ( \
           device_id text primary key, \
           site_id text not null, \
           location text not null, \
           name text not null unique, \
           enabled boolean not null default true, \
           volume integer not null default 50, \
           screen_on boolean not null default true, \
           schedule text, \
           is_online boolean not null default false, \
           is_playing boolean not null default false, \
           current_media text, \
           last_seen_at_ms bigint, \
           ip_address text, \
           mac_address text, \
           system_info text, \
           pending_actions text not null default '{}' \
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query("create index if not exists devices_site_idx on devices (site_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "create index if not exists devices_online_idx on devices (is_online, last_seen_at_ms)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
