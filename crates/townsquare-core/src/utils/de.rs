//! Serde helpers for fields the server does not type consistently.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A count sent either as a number or as the array being counted.
pub fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::Array(items) => Some(items.len() as u64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserialize a like/participant count; missing or null means zero.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_value).unwrap_or(0))
}

/// Deserialize a field the server sends as either a string or a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
