//! 设备内存存储实现
//!
//! 仅用于测试和本地演示。
//!
//! 功能：
//! - 设备 CRUD 操作与按名查找
//! - 心跳写入与离线清扫
//! - 站点级过滤与统计

use crate::error::StorageError;
use crate::models::{DeviceRecord, DeviceStats, DeviceUpdate, HeartbeatUpdate};
use crate::traits::DeviceStore;
use crate::validation::ensure_key;
use domain::{AttrMap, AttrValue};
use std::collections::HashMap;
use std::sync::RwLock;

/// 设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，键为 device_id。
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn list_devices(
        &self,
        site_id: Option<&str>,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        let mut devices: Vec<DeviceRecord> = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .filter(|device| site_id.is_none_or(|site| device.site_id == site))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        Ok(self
            .devices
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DeviceRecord>, StorageError> {
        Ok(self.devices.read().ok().and_then(|map| {
            map.values().find(|device| device.name == name).cloned()
        }))
    }

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        ensure_key(&record.device_id, "device_id")?;
        ensure_key(&record.name, "name")?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.values().any(|device| device.name == record.name) {
            return Err(StorageError::conflict("device name already registered"));
        }
        map.insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) => device,
            None => return Ok(None),
        };
        if let Some(enabled) = update.enabled {
            device.enabled = enabled;
        }
        if let Some(volume) = update.volume {
            device.volume = volume;
        }
        if let Some(screen_on) = update.screen_on {
            device.screen_on = screen_on;
        }
        if let Some(schedule) = update.schedule {
            device.schedule = Some(schedule);
        }
        Ok(Some(device.clone()))
    }

    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(device_id).is_some())
    }

    async fn record_heartbeat(
        &self,
        name: &str,
        update: HeartbeatUpdate,
        now_ms: i64,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.values_mut().find(|device| device.name == name) {
            Some(device) => device,
            None => return Ok(None),
        };
        device.is_online = update.is_online;
        device.is_playing = update.is_playing;
        device.current_media = update.current_media;
        device.last_seen_at_ms = Some(now_ms);
        if let Some(ip_address) = update.ip_address {
            device.ip_address = Some(ip_address);
        }
        if let Some(mac_address) = update.mac_address {
            device.mac_address = Some(mac_address);
        }
        if let Some(system_info) = update.system_info {
            device.system_info = Some(system_info);
        }
        Ok(Some(device.clone()))
    }

    async fn append_pending_action(
        &self,
        device_id: &str,
        action: &str,
        params: Option<AttrMap>,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) => device,
            None => return Ok(None),
        };
        let value = match params {
            Some(params) => AttrValue::Map(params),
            None => AttrValue::Bool(true),
        };
        device.pending_actions.insert(action.to_string(), value);
        Ok(Some(device.clone()))
    }

    async fn sweep_offline(&self, cutoff_ms: i64) -> Result<Vec<String>, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut swept = Vec::new();
        for device in map.values_mut() {
            let stale = device
                .last_seen_at_ms
                .is_some_and(|last_seen| last_seen < cutoff_ms);
            if device.is_online && stale {
                device.is_online = false;
                device.is_playing = false;
                swept.push(device.name.clone());
            }
        }
        swept.sort();
        Ok(swept)
    }

    async fn device_stats(&self, site_id: Option<&str>) -> Result<DeviceStats, StorageError> {
        let map = self
            .devices
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut stats = DeviceStats::default();
        for device in map
            .values()
            .filter(|device| site_id.is_none_or(|site| device.site_id == site))
        {
            stats.total += 1;
            if device.is_online {
                stats.online += 1;
            } else {
                stats.offline += 1;
            }
            if device.is_playing {
                stats.playing += 1;
            }
        }
        Ok(stats)
    }
}
