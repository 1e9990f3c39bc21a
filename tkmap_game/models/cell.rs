use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tkmap_types::{
    errors::MapError,
    map::{CellId, Position},
};

use super::fields::{self, Scalar};

/// What a map cell is, derived from the marker fields it carries.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellCategory {
    /// Settled cell (`village` marker).
    Village,
    /// Bonus tile (`oasis` marker), occupied or not.
    Oasis,
    /// Free valley that could host a village (`resType` marker, no village).
    AbandonedValley,
    /// Anything else: lakes, mountains, forests.
    Wilderness,
}

/// Classifies a cell. Every category query goes through here, which keeps the
/// four categories mutually exclusive.
pub fn classify(cell: &Cell) -> CellCategory {
    if cell.village.is_some() {
        CellCategory::Village
    } else if cell.oasis.is_some() {
        CellCategory::Oasis
    } else if cell.res_type.is_some() {
        CellCategory::AbandonedValley
    } else {
        CellCategory::Wilderness
    }
}

/// A single map cell as sent by the game server.
///
/// Marker keys (`village`, `oasis`, `resType`) count as present as soon as
/// they appear in the record, null values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub village: Option<Value>,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub oasis: Option<Value>,
    #[serde(
        rename = "resType",
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub res_type: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner: Option<Scalar>,
    #[serde(
        rename = "kingdomId",
        default,
        deserialize_with = "fields::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kingdom_id: Option<Scalar>,
    /// Every other key the server sent, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.id.position()
    }

    pub fn category(&self) -> CellCategory {
        classify(self)
    }

    /// Id of the player owning this cell, if any.
    pub fn owner_id(&self) -> Option<&str> {
        fields::reference(fields::text(&self.owner)).or_else(|| {
            let village_owner = self.village.as_ref()?.get("playerId")?.as_str();
            fields::reference(village_owner)
        })
    }

    pub fn village_name(&self) -> Option<&str> {
        self.village.as_ref()?.get("name")?.as_str()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_ok()
    }

    /// Raw access to any field of the record.
    pub fn field(&self, key: &str) -> Result<Value, MapError> {
        let known = match key {
            "id" => Some(Value::String(self.id.to_string())),
            "village" => self.village.clone(),
            "oasis" => self.oasis.clone(),
            "resType" => fields::raw(&self.res_type),
            "owner" => fields::raw(&self.owner),
            "kingdomId" => fields::raw(&self.kingdom_id),
            _ => None,
        };
        fields::resolve("Cell", key, known, &self.extra)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tkmap_types::map::cell_id;

    use super::*;

    fn cell(value: Value) -> Cell {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_classify() {
        let id = "536887296";
        let village = cell(json!({"id": id, "resType": "4446", "village": {"name": "Rome"}}));
        let oasis = cell(json!({"id": id, "oasis": {"oasisStatus": "3"}}));
        let valley = cell(json!({"id": id, "resType": "4446"}));
        let wild = cell(json!({"id": id, "landscape": "9013"}));

        assert_eq!(classify(&village), CellCategory::Village);
        assert_eq!(classify(&oasis), CellCategory::Oasis);
        assert_eq!(classify(&valley), CellCategory::AbandonedValley);
        assert_eq!(classify(&wild), CellCategory::Wilderness);
    }

    #[test]
    fn test_village_marker_wins_over_others() {
        let both = cell(json!({
            "id": "536887296",
            "village": {"name": "x"},
            "oasis": {"oasisStatus": "1"},
            "resType": "4446"
        }));
        assert_eq!(both.category(), CellCategory::Village);

        let oasis_with_res = cell(json!({"id": "536887296", "oasis": {}, "resType": "4446"}));
        assert_eq!(oasis_with_res.category(), CellCategory::Oasis);
    }

    #[test]
    fn test_typed_accessors() {
        let c = cell(json!({
            "id": "536887296",
            "landscape": "9013",
            "owner": "0",
            "village": {"villageId": "536887296", "playerId": "119", "name": "Rome"}
        }));

        assert_eq!(c.id(), cell_id(0, 0).unwrap());
        assert_eq!(c.position(), Position::new(0, 0));
        assert_eq!(c.village_name(), Some("Rome"));
        assert_eq!(c.owner_id(), Some("119"));
    }

    #[test]
    fn test_owner_reference() {
        let owned = cell(json!({"id": 536887296, "owner": 42}));
        assert_eq!(fields::text(&owned.owner), Some("42"));
        assert_eq!(owned.owner_id(), Some("42"));

        let free = cell(json!({"id": "536887296", "owner": "0", "oasis": {}}));
        assert_eq!(free.owner_id(), None);
    }

    #[test]
    fn test_raw_field_access() {
        let c = cell(json!({"id": "536887296", "landscape": "9013", "owner": "0"}));

        assert_eq!(c.field("id").unwrap(), json!("536887296"));
        assert_eq!(c.field("landscape").unwrap(), json!("9013"));
        assert_eq!(c.field("owner").unwrap(), json!("0"));
        assert!(c.contains("id"));
        assert!(!c.contains("village"));
        assert_eq!(
            c.field("asdf"),
            Err(MapError::FieldNotFound {
                entity: "Cell",
                key: "asdf".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        assert!(serde_json::from_value::<Cell>(json!({"id": "-1"})).is_err());
        assert!(serde_json::from_value::<Cell>(json!({"landscape": "9013"})).is_err());
    }

    #[test]
    fn test_serializes_back_to_wire_shape() {
        let raw = json!({"id": "536887296", "landscape": "9013", "resType": "4446"});
        let c = cell(raw.clone());
        assert_eq!(serde_json::to_value(&c).unwrap(), raw);
    }

    #[test]
    fn test_null_marker_is_present() {
        let c = cell(json!({"id": "536887296", "oasis": null, "resType": "4446"}));

        assert_eq!(c.category(), CellCategory::Oasis);
        assert_eq!(c.field("oasis").unwrap(), Value::Null);
        assert!(c.contains("oasis"));
        assert!(!c.contains("village"));

        let village = cell(json!({"id": "536887296", "village": null, "oasis": {}}));
        assert_eq!(village.category(), CellCategory::Village);
        assert_eq!(
            serde_json::to_value(&village).unwrap(),
            json!({"id": "536887296", "village": null, "oasis": {}})
        );
    }

    #[test]
    fn test_raw_field_keeps_wire_type() {
        let c = cell(json!({"id": "536887296", "resType": 4446, "owner": 119, "kingdomId": "0"}));

        assert_eq!(c.field("resType").unwrap(), json!(4446));
        assert_eq!(c.field("owner").unwrap(), json!(119));
        assert_eq!(c.field("kingdomId").unwrap(), json!("0"));
        assert_eq!(c.owner_id(), Some("119"));
        assert_eq!(c.category(), CellCategory::AbandonedValley);
    }
}
