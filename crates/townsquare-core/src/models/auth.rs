use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of the auth endpoints, kept whole.
///
/// `token` and `message` are lifted out for convenience; every other field
/// the server sent is preserved in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthResponse {
    /// Non-object payloads (a bare string, say) are kept under `extra["data"]`.
    pub(crate) fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_else(|_| Self {
                extra: value.as_object().cloned().unwrap_or_default(),
                ..Self::default()
            }),
            Value::Null => Self::default(),
            other => {
                let mut extra = Map::new();
                extra.insert("data".to_string(), other);
                Self {
                    extra,
                    ..Self::default()
                }
            }
        }
    }
}
