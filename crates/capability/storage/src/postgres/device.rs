//! Postgres 设备注册表实现
//!
//! 设计要点：
//! - 所有操作使用参数化 SQL
//! - JSON 值字段（schedule/system_info/pending_actions）以文本列存储
//! - 心跳与离线清扫各为单条 SQL，依赖数据库的原子提交；
//!   同一设备的并发写入为后提交者胜出

use crate::error::StorageError;
use crate::models::{DeviceRecord, DeviceStats, DeviceUpdate, HeartbeatUpdate};
use crate::traits::DeviceStore;
use crate::validation::ensure_key;
use domain::{AttrMap, AttrValue};
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

/// 设备表的完整列清单（select/returning 共用）。
const DEVICE_COLUMNS: &str = "device_id, site_id, location, name, enabled, volume, screen_on, \
     schedule, is_online, is_playing, current_media, last_seen_at_ms, \
     ip_address, mac_address, system_info, pending_actions";

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_attr_map(raw: Option<String>, field: &str) -> Result<Option<AttrMap>, StorageError> {
    match raw {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::new(format!("invalid {field} json: {err}"))),
        None => Ok(None),
    }
}

fn attr_map_to_text(map: &Option<AttrMap>, field: &str) -> Result<Option<String>, StorageError> {
    match map {
        Some(map) => serde_json::to_string(map)
            .map(Some)
            .map_err(|err| StorageError::new(format!("encode {field} json: {err}"))),
        None => Ok(None),
    }
}

fn device_from_row(row: &PgRow) -> Result<DeviceRecord, StorageError> {
    let schedule: Option<String> = row.try_get("schedule")?;
    let system_info: Option<String> = row.try_get("system_info")?;
    let pending_actions: String = row.try_get("pending_actions")?;
    Ok(DeviceRecord {
        device_id: row.try_get("device_id")?,
        site_id: row.try_get("site_id")?,
        location: row.try_get("location")?,
        name: row.try_get("name")?,
        enabled: row.try_get("enabled")?,
        volume: row.try_get("volume")?,
        screen_on: row.try_get("screen_on")?,
        schedule: parse_attr_map(schedule, "schedule")?,
        is_online: row.try_get("is_online")?,
        is_playing: row.try_get("is_playing")?,
        current_media: row.try_get("current_media")?,
        last_seen_at_ms: row.try_get("last_seen_at_ms")?,
        ip_address: row.try_get("ip_address")?,
        mac_address: row.try_get("mac_address")?,
        system_info: parse_attr_map(system_info, "system_info")?,
        pending_actions: serde_json::from_str(&pending_actions)
            .map_err(|err| StorageError::new(format!("invalid pending_actions json: {err}")))?,
    })
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn list_devices(
        &self,
        site_id: Option<&str>,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        let sql = format!(
            "select {DEVICE_COLUMNS} from devices \
             where $1::text is null or site_id = $1 order by name"
        );
        let rows = sqlx::query(&sql)
            .bind(site_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(device_from_row).collect()
    }

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let sql = format!("select {DEVICE_COLUMNS} from devices where device_id = $1");
        let row = sqlx::query(&sql)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let sql = format!("select {DEVICE_COLUMNS} from devices where name = $1");
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        ensure_key(&record.device_id, "device_id")?;
        ensure_key(&record.name, "name")?;
        let schedule = attr_map_to_text(&record.schedule, "schedule")?;
        let system_info = attr_map_to_text(&record.system_info, "system_info")?;
        let pending_actions = serde_json::to_string(&record.pending_actions)
            .map_err(|err| StorageError::new(format!("encode pending_actions json: {err}")))?;
        sqlx::query(
            "insert into devices (device_id, site_id, location, name, enabled, volume, \
             screen_on, schedule, is_online, is_playing, current_media, last_seen_at_ms, \
             ip_address, mac_address, system_info, pending_actions) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(&record.device_id)
        .bind(&record.site_id)
        .bind(&record.location)
        .bind(&record.name)
        .bind(record.enabled)
        .bind(record.volume)
        .bind(record.screen_on)
        .bind(schedule)
        .bind(record.is_online)
        .bind(record.is_playing)
        .bind(&record.current_media)
        .bind(record.last_seen_at_ms)
        .bind(&record.ip_address)
        .bind(&record.mac_address)
        .bind(system_info)
        .bind(pending_actions)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let schedule = attr_map_to_text(&update.schedule, "schedule")?;
        let sql = format!(
            "update devices set \
             enabled = coalesce($1, enabled), \
             volume = coalesce($2, volume), \
             screen_on = coalesce($3, screen_on), \
             schedule = coalesce($4, schedule) \
             where device_id = $5 \
             returning {DEVICE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.enabled)
            .bind(update.volume)
            .bind(update.screen_on)
            .bind(schedule)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from devices where device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_heartbeat(
        &self,
        name: &str,
        update: HeartbeatUpdate,
        now_ms: i64,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let system_info = attr_map_to_text(&update.system_info, "system_info")?;
        let sql = format!(
            "update devices set \
             is_online = $1, \
             is_playing = $2, \
             current_media = $3, \
             last_seen_at_ms = $4, \
             ip_address = coalesce($5, ip_address), \
             mac_address = coalesce($6, mac_address), \
             system_info = coalesce($7, system_info) \
             where name = $8 \
             returning {DEVICE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.is_online)
            .bind(update.is_playing)
            .bind(&update.current_media)
            .bind(now_ms)
            .bind(&update.ip_address)
            .bind(&update.mac_address)
            .bind(system_info)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn append_pending_action(
        &self,
        device_id: &str,
        action: &str,
        params: Option<AttrMap>,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        // 读改写放进一个事务，避免并发入队互相覆盖
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "select pending_actions from devices where device_id = $1 for update",
        )
        .bind(device_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("pending_actions")?;
        let mut actions: AttrMap = serde_json::from_str(&raw)
            .map_err(|err| StorageError::new(format!("invalid pending_actions json: {err}")))?;
        let value = match params {
            Some(params) => AttrValue::Map(params),
            None => AttrValue::Bool(true),
        };
        actions.insert(action.to_string(), value);
        let encoded = serde_json::to_string(&actions)
            .map_err(|err| StorageError::new(format!("encode pending_actions json: {err}")))?;
        let sql = format!(
            "update devices set pending_actions = $1 where device_id = $2 \
             returning {DEVICE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(encoded)
            .bind(device_id)
            .fetch_one(&mut *tx)
            .await?;
        let record = device_from_row(&row)?;
        tx.commit().await?;
        Ok(Some(record))
    }

    async fn sweep_offline(&self, cutoff_ms: i64) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            "update devices set is_online = false, is_playing = false \
             where is_online and last_seen_at_ms is not null and last_seen_at_ms < $1 \
             returning name",
        )
        .bind(cutoff_ms)
        .fetch_all(&self.pool)
        .await?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.try_get("name")?);
        }
        Ok(names)
    }

    async fn device_stats(&self, site_id: Option<&str>) -> Result<DeviceStats, StorageError> {
        let row = sqlx::query(
            "select count(*) as total, \
             count(*) filter (where is_online) as online, \
             count(*) filter (where is_playing) as playing \
             from devices where $1::text is null or site_id = $1",
        )
        .bind(site_id)
        .fetch_one(&self.pool)
        .await?;
        let total: i64 = row.try_get("total")?;
        let online: i64 = row.try_get("online")?;
        let playing: i64 = row.try_get("playing")?;
        Ok(DeviceStats {
            total,
            online,
            offline: total - online,
            playing,
        })
    }
}
