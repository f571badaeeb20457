//! Typed attribute values carried alongside sleep events.
//!
//! The MQTT payload's key/value pairs (minus the `event` discriminator) are
//! stored verbatim on the consuming sensor — decoded JSON scalars and
//! structures, no type coercion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Auxiliary metadata attached to an event, keyed by attribute name.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) if n.is_i64() => {
                // as_i64 is Some by the guard above
                Self::Int(n.as_i64().unwrap_or_default())
            }
            serde_json::Value::Number(n) => Self::Float(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Self::String(s),
            other => Self::Json(other),
        }
    }
}

/// Convert a decoded JSON object into an [`AttributeMap`], preserving every
/// key/value pair as-is.
#[must_use]
pub fn attribute_map_from(object: serde_json::Map<String, serde_json::Value>) -> AttributeMap {
    object
        .into_iter()
        .map(|(key, value)| (key, AttributeValue::from(value)))
        .collect()
}
