//! Postgres 用户存储实现

use crate::error::StorageError;
use crate::models::{UserRecord, UserUpdate};
use crate::traits::UserStore;
use crate::validation::ensure_key;
use domain::Role;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|err| StorageError::new(err.to_string()))?;
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role,
        site_id: row.try_get("site_id")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            "select user_id, email, password_hash, role, site_id \
             from users where user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            "select user_id, email, password_hash, role, site_id \
             from users where email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows = sqlx::query(
            "select user_id, email, password_hash, role, site_id \
             from users order by email",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        ensure_key(&record.user_id, "user_id")?;
        ensure_key(&record.email, "email")?;
        sqlx::query(
            "insert into users (user_id, email, password_hash, role, site_id) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.user_id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(&record.site_id)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            "update users set \
             email = coalesce($1, email), \
             password_hash = coalesce($2, password_hash), \
             role = coalesce($3, role), \
             site_id = coalesce($4, site_id) \
             where user_id = $5 \
             returning user_id, email, password_hash, role, site_id",
        )
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.role.map(|role| role.as_str().to_string()))
        .bind(update.site_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from users where user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set password_hash = $1 where user_id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn has_superadmin(&self) -> Result<bool, StorageError> {
        let row = sqlx::query("select count(*) as total from users where role = $1")
            .bind(Role::SuperAdmin.as_str())
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total > 0)
    }
}
