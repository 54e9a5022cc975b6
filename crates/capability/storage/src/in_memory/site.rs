//! 站点内存存储实现
//!
//! 仅用于测试和本地演示。

use crate::error::StorageError;
use crate::models::{SiteRecord, SiteUpdate};
use crate::traits::SiteStore;
use crate::validation::ensure_key;
use std::collections::HashMap;
use std::sync::RwLock;

/// 站点内存存储
pub struct InMemorySiteStore {
    sites: RwLock<HashMap<String, SiteRecord>>,
}

impl InMemorySiteStore {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySiteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SiteStore for InMemorySiteStore {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, StorageError> {
        let mut sites: Vec<SiteRecord> = self
            .sites
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }

    async fn find_site(&self, site_id: &str) -> Result<Option<SiteRecord>, StorageError> {
        Ok(self
            .sites
            .read()
            .ok()
            .and_then(|map| map.get(site_id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SiteRecord>, StorageError> {
        Ok(self.sites.read().ok().and_then(|map| {
            map.values().find(|site| site.name == name).cloned()
        }))
    }

    async fn create_site(&self, record: SiteRecord) -> Result<SiteRecord, StorageError> {
        ensure_key(&record.site_id, "site_id")?;
        ensure_key(&record.name, "name")?;
        let mut map = self
            .sites
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.values().any(|site| site.name == record.name) {
            return Err(StorageError::conflict("site name already exists"));
        }
        map.insert(record.site_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_site(
        &self,
        site_id: &str,
        update: SiteUpdate,
    ) -> Result<Option<SiteRecord>, StorageError> {
        let mut map = self
            .sites
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(name) = update.name.as_deref() {
            if map
                .values()
                .any(|site| site.name == name && site.site_id != site_id)
            {
                return Err(StorageError::conflict("site name already exists"));
            }
        }
        let site = match map.get_mut(site_id) {
            Some(site) => site,
            None => return Ok(None),
        };
        if let Some(name) = update.name {
            site.name = name;
        }
        if let Some(address) = update.address {
            site.address = address;
        }
        Ok(Some(site.clone()))
    }

    async fn delete_site(&self, site_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .sites
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(site_id).is_some())
    }
}
