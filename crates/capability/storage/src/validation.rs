//! 验证辅助函数
//!
//! 提供统一的验证逻辑，确保数据一致性：
//! - ensure_key：关键标识字段非空校验
//!
//! 使用场景：
//! - 创建记录前校验 ID、名称、邮箱等唯一键字段

use crate::error::StorageError;

/// 关键标识字段非空校验
pub fn ensure_key(value: &str, field: &str) -> Result<(), StorageError> {
    if value.trim().is_empty() {
        return Err(StorageError::new(format!("{field} required")));
    }
    Ok(())
}
