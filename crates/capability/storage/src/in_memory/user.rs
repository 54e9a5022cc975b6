//! 用户内存存储实现
//!
//! 仅用于测试和本地演示。

use crate::error::StorageError;
use crate::models::{UserRecord, UserUpdate};
use crate::traits::UserStore;
use crate::validation::ensure_key;
use domain::Role;
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.read().ok().and_then(|map| {
            map.values().find(|user| user.email == email).cloned()
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        ensure_key(&record.user_id, "user_id")?;
        ensure_key(&record.email, "email")?;
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.values().any(|user| user.email == record.email) {
            return Err(StorageError::conflict("email already registered"));
        }
        map.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(email) = update.email.as_deref() {
            if map
                .values()
                .any(|user| user.email == email && user.user_id != user_id)
            {
                return Err(StorageError::conflict("email already registered"));
            }
        }
        let user = match map.get_mut(user_id) {
            Some(user) => user,
            None => return Ok(None),
        };
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(site_id) = update.site_id {
            user.site_id = Some(site_id);
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(user_id).is_some())
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn has_superadmin(&self) -> Result<bool, StorageError> {
        Ok(self
            .users
            .read()
            .map(|map| map.values().any(|user| user.role == Role::SuperAdmin))
            .unwrap_or(false))
    }
}
