use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde_json::{Map, Value, json};

use tkmap_types::map::{CellId, Position};

use crate::models::{
    cell::Cell, cell::CellCategory, kingdom::Kingdom, player::Player, region::RegionPartition,
};

#[derive(Default, Clone)]
pub struct CellFactoryOptions {
    pub position: Option<Position>,
    pub category: Option<CellCategory>,
    pub owner: Option<String>,
    pub village_name: Option<String>,
}

#[derive(Default, Clone)]
pub struct PlayerFactoryOptions {
    pub id: Option<String>,
    pub name: Option<String>,
    pub tribe_id: Option<String>,
    pub kingdom_id: Option<String>,
    pub active: Option<bool>,
}

#[derive(Default, Clone)]
pub struct KingdomFactoryOptions {
    pub id: Option<String>,
    pub tag: Option<String>,
}

/// Wire record of a cell, shaped like the ones the game server sends.
pub fn cell_record(options: CellFactoryOptions) -> Value {
    let position = options.position.unwrap_or(Position { x: 0, y: 0 });
    let id = position.to_cell_id().unwrap().to_string();
    let owner = options.owner.unwrap_or_else(|| "0".to_string());

    match options.category.unwrap_or(CellCategory::Wilderness) {
        CellCategory::Village => json!({
            "id": id,
            "landscape": "9013",
            "resType": "4446",
            "owner": owner,
            "village": {
                "villageId": id,
                "playerId": owner,
                "name": options.village_name.unwrap_or_else(|| format!("Village {id}")),
                "population": "150",
            },
        }),
        CellCategory::Oasis => json!({
            "id": id,
            "landscape": "9002",
            "owner": owner,
            "oasis": {"oasisStatus": "3", "bonus": {"1": 25}},
        }),
        CellCategory::AbandonedValley => json!({
            "id": id,
            "landscape": "9013",
            "resType": "4446",
            "owner": "0",
        }),
        CellCategory::Wilderness => json!({
            "id": id,
            "landscape": "9013",
            "owner": "0",
        }),
    }
}

pub fn cell_factory(options: CellFactoryOptions) -> Cell {
    serde_json::from_value(cell_record(options)).unwrap()
}

/// Wire record of a player, with the key it has in the `player` table.
pub fn player_record(options: PlayerFactoryOptions) -> (String, Value) {
    let id = options.id.unwrap_or_else(|| "1".to_string());
    let record = json!({
        "name": options.name.unwrap_or_else(|| format!("Player {id}")),
        "tribeId": options.tribe_id.unwrap_or_else(|| "1".to_string()),
        "kingdomId": options.kingdom_id.unwrap_or_else(|| "0".to_string()),
        "active": if options.active.unwrap_or(true) { "1" } else { "0" },
    });
    (id, record)
}

pub fn player_factory(options: PlayerFactoryOptions) -> Player {
    let (id, record) = player_record(options);
    Player::from_record(&id, &record).unwrap()
}

pub fn kingdom_record(options: KingdomFactoryOptions) -> (String, Value) {
    let id = options.id.unwrap_or_else(|| "1".to_string());
    let record = json!({
        "tag": options.tag.unwrap_or_else(|| format!("K{id}")),
    });
    (id, record)
}

pub fn kingdom_factory(options: KingdomFactoryOptions) -> Kingdom {
    let (id, record) = kingdom_record(options);
    Kingdom::from_record(&id, &record).unwrap()
}

/// Shape of a generated world. Counts are exact in the generated response.
#[derive(Debug, Clone)]
pub struct WorldFixtureOptions {
    pub villages: usize,
    pub abandoned_valleys: usize,
    /// Every oasis cell, including the `oasis_valleys`.
    pub oases: usize,
    /// Oases that also carry a `resType` marker. They classify as oases.
    pub oasis_valleys: usize,
    pub wilderness: usize,
    pub kingdoms: usize,
    pub players: usize,
    pub inactive_players: usize,
    /// Players with no kingdom; they own all the grey villages.
    pub kingdomless_players: usize,
    pub grey_villages: usize,
    pub unoccupied_oases: usize,
    pub seed: u64,
}

impl WorldFixtureOptions {
    /// A full-size world, matching a real server dump: every cell of the 729
    /// regions, one of its oases carrying a `resType` marker too.
    pub fn full_world() -> Self {
        Self {
            villages: 2376,
            abandoned_valleys: 5814,
            oases: 1226,
            oasis_valleys: 1,
            wilderness: 26305,
            kingdoms: 161,
            players: 1624,
            inactive_players: 114,
            kingdomless_players: 40,
            grey_villages: 115,
            unoccupied_oases: 747,
            seed: 42,
        }
    }

    pub fn total_cells(&self) -> usize {
        self.villages + self.abandoned_valleys + self.oases + self.wilderness
    }
}

/// Generates a `map.getByRegionIds` response body for a random world.
///
/// Cells take the partition positions closest to (0|0) and are grouped under
/// the anchor of the region they belong to, so a real server could have sent
/// them. Categories are shuffled with a seeded rng. Player `i` (ids start at
/// "1") is kingdomless when `i < kingdomless_players` and inactive when it's
/// among the last `inactive_players`.
pub fn world_response(options: &WorldFixtureOptions) -> Value {
    assert!(options.kingdomless_players <= options.players);
    assert!(options.grey_villages == 0 || options.kingdomless_players > 0);
    assert!(options.grey_villages == options.villages || options.players > options.kingdomless_players);
    assert!(options.kingdoms > 0 || options.kingdomless_players == options.players);
    assert!(options.oasis_valleys + options.unoccupied_oases <= options.oases);

    let player_id = |index: usize| (index + 1).to_string();
    let with_kingdom = options.players - options.kingdomless_players;

    let mut players = Map::new();
    for i in 0..options.players {
        let kingdom_id = if i < options.kingdomless_players {
            "0".to_string()
        } else {
            ((i - options.kingdomless_players) % options.kingdoms + 1).to_string()
        };
        let (id, record) = player_record(PlayerFactoryOptions {
            id: Some(player_id(i)),
            kingdom_id: Some(kingdom_id),
            tribe_id: Some((i % 3 + 1).to_string()),
            active: Some(i < options.players - options.inactive_players),
            ..Default::default()
        });
        players.insert(id, record);
    }

    let mut kingdoms = Map::new();
    for i in 0..options.kingdoms {
        let (id, record) = kingdom_record(KingdomFactoryOptions {
            id: Some((i + 1).to_string()),
            ..Default::default()
        });
        kingdoms.insert(id, record);
    }

    // (category, owner, carries resType)
    let mut blueprints: Vec<(CellCategory, Option<String>, bool)> =
        Vec::with_capacity(options.total_cells());
    for j in 0..options.villages {
        let owner = if j < options.grey_villages {
            j % options.kingdomless_players
        } else {
            options.kingdomless_players + (j - options.grey_villages) % with_kingdom
        };
        blueprints.push((CellCategory::Village, Some(player_id(owner)), false));
    }
    for j in 0..options.oases {
        let owner = (j >= options.unoccupied_oases).then(|| player_id(j % options.players));
        let with_res_type = j >= options.oases - options.oasis_valleys;
        blueprints.push((CellCategory::Oasis, owner, with_res_type));
    }
    blueprints.extend(
        (0..options.abandoned_valleys).map(|_| (CellCategory::AbandonedValley, None, false)),
    );
    blueprints.extend((0..options.wilderness).map(|_| (CellCategory::Wilderness, None, false)));

    let mut rng = StdRng::seed_from_u64(options.seed);
    blueprints.shuffle(&mut rng);

    let partition = RegionPartition::new();
    let origin = Position::new(0, 0);
    let mut slots: Vec<(CellId, CellId)> = partition
        .regions()
        .flat_map(|region| region.members.iter().map(move |&id| (region.anchor, id)))
        .collect();
    assert!(blueprints.len() <= slots.len(), "world larger than the partition");
    slots.sort_by(|(_, a), (_, b)| {
        origin
            .distance(&a.position())
            .total_cmp(&origin.distance(&b.position()))
            .then(a.cmp(b))
    });

    let mut regions: Map<String, Value> = Map::new();
    for ((category, owner, with_res_type), (anchor, id)) in blueprints.into_iter().zip(slots) {
        let mut record = cell_record(CellFactoryOptions {
            position: Some(id.position()),
            category: Some(category),
            owner,
            village_name: None,
        });
        if with_res_type {
            record["resType"] = json!("4446");
        }

        regions
            .entry(anchor.to_string())
            .or_insert_with(|| Value::Array(vec![]))
            .as_array_mut()
            .unwrap()
            .push(record);
    }

    json!({
        "response": {
            "1": {
                "region": regions,
                "player": players,
                "kingdom": kingdoms,
            }
        }
    })
}
