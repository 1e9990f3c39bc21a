use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use tkmap_game::models::{cell::Cell, kingdom::Kingdom, player::Player, snapshot::Snapshot};
use tkmap_types::{errors::TransportError, map::CellId};

/// Decodes a `map.getByRegionIds` response body into a fresh snapshot.
///
/// Only a body without a `response` object is an error. Groups the server
/// flagged as failed, and records that don't decode, are logged and skipped.
pub fn decode_regions(body: &Value) -> Result<Snapshot, TransportError> {
    let groups = body
        .get("response")
        .and_then(Value::as_object)
        .ok_or_else(|| TransportError::MalformedResponse("missing `response` object".to_string()))?;

    let mut snapshot = Snapshot::new();

    for (group, payload) in groups {
        let Some(payload) = payload.as_object() else {
            warn!(group = group.as_str(), "Skipping map group that is not an object");
            continue;
        };
        if let Some(error) = payload.get("error") {
            warn!(group = group.as_str(), %error, "Skipping map group reported as failed");
            continue;
        }

        if let Some(regions) = payload.get("region").and_then(Value::as_object) {
            for (key, region) in regions {
                decode_region(&mut snapshot, key, region);
            }
        }

        if let Some(players) = payload.get("player").and_then(Value::as_object) {
            for (id, record) in players {
                match Player::from_record(id, record) {
                    Ok(player) => snapshot.insert_player(player),
                    Err(e) => warn!(player_id = id.as_str(), error = %e, "Skipping malformed player record"),
                }
            }
        }

        if let Some(kingdoms) = payload.get("kingdom").and_then(Value::as_object) {
            for (id, record) in kingdoms {
                match Kingdom::from_record(id, record) {
                    Ok(kingdom) => snapshot.insert_kingdom(kingdom),
                    Err(e) => {
                        warn!(kingdom_id = id.as_str(), error = %e, "Skipping malformed kingdom record")
                    }
                }
            }
        }
    }

    Ok(snapshot)
}

fn decode_region(snapshot: &mut Snapshot, key: &str, region: &Value) {
    let anchor = match key.parse::<CellId>() {
        Ok(anchor) => anchor,
        Err(e) => {
            warn!(region = key, error = %e, "Skipping region with invalid id");
            return;
        }
    };

    // regions come either as a bare list or wrapped in `{"cell": [...]}`
    let records = match region {
        Value::Array(records) => records,
        Value::Object(wrapper) => match wrapper.get("cell").and_then(Value::as_array) {
            Some(records) => records,
            None => {
                warn!(region = key, "Skipping region without cells");
                return;
            }
        },
        _ => {
            warn!(region = key, "Skipping region with unexpected shape");
            return;
        }
    };

    for record in records {
        match Cell::deserialize(record) {
            Ok(cell) => snapshot.insert_cell(anchor, cell),
            Err(e) => warn!(region = key, error = %e, "Skipping malformed cell record"),
        }
    }
}
