//! Postgres 站点存储实现

use crate::error::StorageError;
use crate::models::{SiteRecord, SiteUpdate};
use crate::traits::SiteStore;
use crate::validation::ensure_key;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

pub struct PgSiteStore {
    pub pool: PgPool,
}

impl PgSiteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn site_from_row(row: &PgRow) -> Result<SiteRecord, StorageError> {
    Ok(SiteRecord {
        site_id: row.try_get("site_id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
    })
}

#[async_trait::async_trait]
impl SiteStore for PgSiteStore {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, StorageError> {
        let rows = sqlx::query("select site_id, name, address from sites order by name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(site_from_row).collect()
    }

    async fn find_site(&self, site_id: &str) -> Result<Option<SiteRecord>, StorageError> {
        let row = sqlx::query("select site_id, name, address from sites where site_id = $1")
            .bind(site_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(site_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SiteRecord>, StorageError> {
        let row = sqlx::query("select site_id, name, address from sites where name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(site_from_row).transpose()
    }

    async fn create_site(&self, record: SiteRecord) -> Result<SiteRecord, StorageError> {
        ensure_key(&record.site_id, "site_id")?;
        ensure_key(&record.name, "name")?;
        sqlx::query("insert into sites (site_id, name, address) values ($1, $2, $3)")
            .bind(&record.site_id)
            .bind(&record.name)
            .bind(&record.address)
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn update_site(
        &self,
        site_id: &str,
        update: SiteUpdate,
    ) -> Result<Option<SiteRecord>, StorageError> {
        let row = sqlx::query(
            "update sites set \
             name = coalesce($1, name), \
             address = coalesce($2, address) \
             where site_id = $3 \
             returning site_id, name, address",
        )
        .bind(update.name)
        .bind(update.address)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(site_from_row).transpose()
    }

    async fn delete_site(&self, site_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from sites where site_id = $1")
            .bind(site_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
