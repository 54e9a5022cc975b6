//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - SQL 执行错误
//! - 唯一键冲突（站点名、设备名、用户邮箱）
//! - 表尚未创建（进程启动早期，离线监测需要容忍）

#[derive(Debug)]
pub struct StorageError {
    message: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    Internal,
    Conflict,
    SchemaMissing,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Internal,
        }
    }

    /// 唯一键冲突（重复的站点名/设备名/邮箱）。
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Conflict,
        }
    }

    /// 表尚未创建（Postgres 42P01）。
    pub fn schema_missing(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::SchemaMissing,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    pub fn is_schema_missing(&self) -> bool {
        self.kind == ErrorKind::SchemaMissing
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => return Self::conflict(db_err.to_string()),
                // undefined_table
                Some("42P01") => return Self::schema_missing(db_err.to_string()),
                _ => {}
            }
        }
        Self::new(err.to_string())
    }
}
