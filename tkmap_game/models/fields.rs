use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use tkmap_types::errors::MapError;

/// A scalar the server sends either as a string or as a number.
///
/// Keeps the value exactly as received, plus the text form used for
/// comparisons and lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    text: String,
    raw: Value,
}

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl From<Value> for Scalar {
    fn from(raw: Value) -> Self {
        let text = match &raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            _ => String::new(),
        };
        Self { text, raw }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Scalar::from)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// A key that shows up on the wire is present, even when its value is null.
/// Pair with `#[serde(default)]` so missing keys stay `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Text of an optional scalar.
pub(crate) fn text(value: &Option<Scalar>) -> Option<&str> {
    value.as_ref().map(Scalar::as_str)
}

/// Raw wire value of an optional scalar.
pub(crate) fn raw(value: &Option<Scalar>) -> Option<Value> {
    value.as_ref().map(|s| s.raw().clone())
}

/// Empty strings and "0" mean "no reference" on the wire.
pub(crate) fn reference(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "0")
}

/// Raw-key access shared by every record type: modelled fields first, then
/// the residual map of keys the model doesn't know about.
pub(crate) fn resolve(
    entity: &'static str,
    key: &str,
    known: Option<Value>,
    extra: &Map<String, Value>,
) -> Result<Value, MapError> {
    known
        .or_else(|| extra.get(key).cloned())
        .ok_or_else(|| MapError::FieldNotFound {
            entity,
            key: key.to_string(),
        })
}
