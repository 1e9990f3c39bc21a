use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tkmap_types::errors::MapError;

use super::fields::{self, Scalar};

/// A player as listed in the `player` table of a map response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Filled from the key of the `player` table.
    #[serde(rename = "playerId", default)]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Scalar>,
    #[serde(
        rename = "tribeId",
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub tribe_id: Option<Scalar>,
    #[serde(
        rename = "kingdomId",
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kingdom_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<Scalar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Player {
    /// Builds a player from one entry of the `player` table.
    pub fn from_record(id: &str, record: &Value) -> Result<Self, serde_json::Error> {
        let mut player = Player::deserialize(record)?;
        player.id = id.to_string();
        Ok(player)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        fields::text(&self.name)
    }

    pub fn tribe_id(&self) -> Option<&str> {
        fields::text(&self.tribe_id)
    }

    /// Kingdom this player belongs to, `None` for kingdomless players.
    pub fn kingdom_id(&self) -> Option<&str> {
        fields::reference(fields::text(&self.kingdom_id))
    }

    pub fn is_active(&self) -> bool {
        fields::text(&self.active) == Some("1")
    }

    pub fn field(&self, key: &str) -> Result<Value, MapError> {
        let known = match key {
            "playerId" => Some(Value::String(self.id.clone())),
            "name" => fields::raw(&self.name),
            "tribeId" => fields::raw(&self.tribe_id),
            "kingdomId" => fields::raw(&self.kingdom_id),
            "active" => fields::raw(&self.active),
            _ => None,
        };
        fields::resolve("Player", key, known, &self.extra)
    }
}
