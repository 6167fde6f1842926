//! Canonical cache keys
//!
//! Two keys that serialize to the same JSON structure produce the same
//! string, whatever order their fields were written in.

use serde::Serialize;
use serde_json::Value;

/// Structural JSON key with object fields sorted and null fields dropped
pub fn canonical_key<K: Serialize + ?Sized>(key: &K) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(key)?;
    serde_json::to_string(&normalize(value))
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(String, Value)> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, normalize(v)))
                .collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(fields.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}
