use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tkmap_types::errors::MapError;

use super::fields::{self, Scalar};

/// A kingdom (alliance) as listed in the `kingdom` table of a map response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kingdom {
    #[serde(rename = "kingdomId", default)]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<Scalar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Kingdom {
    pub fn from_record(id: &str, record: &Value) -> Result<Self, serde_json::Error> {
        let mut kingdom = Kingdom::deserialize(record)?;
        kingdom.id = id.to_string();
        Ok(kingdom)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tag is what the game shows as the kingdom name.
    pub fn name(&self) -> Option<&str> {
        fields::text(&self.tag)
    }

    pub fn field(&self, key: &str) -> Result<Value, MapError> {
        let known = match key {
            "kingdomId" => Some(Value::String(self.id.clone())),
            "tag" => fields::raw(&self.tag),
            _ => None,
        };
        fields::resolve("Kingdom", key, known, &self.extra)
    }
}
