//! 设备动态属性的结构化表示。
//!
//! `system_info`、`schedule`、`pending_actions` 在线上是开放的 JSON 对象，
//! 这里用一个小型标签联合（bool | number | string | 嵌套映射）代替
//! 无类型 blob，保持线上兼容的同时获得结构。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 属性映射：属性名 → 属性值。
///
/// `pending_actions` 中值为 `true` 表示无参数动作。
pub type AttrMap = BTreeMap<String, AttrValue>;

/// 属性值联合。
///
/// untagged 反序列化按变体声明顺序尝试，bool 必须在 number 之前。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    String(String),
    Map(AttrMap),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<AttrMap> for AttrValue {
    fn from(value: AttrMap) -> Self {
        AttrValue::Map(value)
    }
}
