use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A source text and its translation.
///
/// `value` is optional because storage may hold an item whose translation
/// attribute was never written; such a record is treated as not found by
/// point lookups. An explicit `null` is a present value, only a missing
/// field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

// 字段存在（包括 null）即视为有值；缺失字段由 `default` 处理为 None
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { key: key.into(), value: Some(value.into()) }
    }

    pub fn without_value(key: impl Into<String>) -> Self {
        Self { key: key.into(), value: None }
    }

    /// Consume the record, yielding its value when one is present.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}
