use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use tkmap_types::map::{CellId, Position};

use super::{
    cell::{Cell, CellCategory, classify},
    kingdom::Kingdom,
    player::Player,
};

/// Counts of what a snapshot holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub cells: usize,
    pub villages: usize,
    pub abandoned_valleys: usize,
    pub oases: usize,
    pub wilderness: usize,
    pub grey_villages: usize,
    pub unoccupied_oases: usize,
    pub players: usize,
    pub inactive_players: usize,
    pub kingdoms: usize,
}

/// Local copy of everything received from the map endpoint.
///
/// The snapshot only grows: merging replaces cells, players and kingdoms that
/// come in again and keeps everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    cells: BTreeMap<CellId, Cell>,
    regions: BTreeMap<CellId, BTreeSet<CellId>>,
    players: BTreeMap<String, Player>,
    kingdoms: BTreeMap<String, Kingdom>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cell(&mut self, region: CellId, cell: Cell) {
        self.regions.entry(region).or_default().insert(cell.id);
        self.cells.insert(cell.id, cell);
    }

    pub fn insert_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    pub fn insert_kingdom(&mut self, kingdom: Kingdom) {
        self.kingdoms.insert(kingdom.id.clone(), kingdom);
    }

    pub fn merge(&mut self, other: Snapshot) {
        for (region, ids) in other.regions {
            self.regions.entry(region).or_default().extend(ids);
        }
        self.cells.extend(other.cells);
        self.players.extend(other.players);
        self.kingdoms.extend(other.kingdoms);
    }

    /// Number of cells held.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// No cells held. Players and kingdoms don't count.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Ids of the regions that delivered at least one cell.
    pub fn region_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.regions.keys().copied()
    }

    pub fn cells_in_region(&self, region: CellId) -> impl Iterator<Item = &Cell> + '_ {
        self.regions
            .get(&region)
            .into_iter()
            .flatten()
            .filter_map(|id| self.cells.get(id))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    pub fn cell_by_id(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Cell at `(x, y)`. Coordinates outside the world are just a miss.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        let id = Position::new(x, y).to_cell_id().ok()?;
        self.cell_by_id(id)
    }

    pub fn cells_of(&self, category: CellCategory) -> impl Iterator<Item = &Cell> + '_ {
        self.cells().filter(move |c| classify(c) == category)
    }

    pub fn villages(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells_of(CellCategory::Village)
    }

    pub fn abandoned_valleys(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells_of(CellCategory::AbandonedValley)
    }

    pub fn oases(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells_of(CellCategory::Oasis)
    }

    pub fn wilderness(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells_of(CellCategory::Wilderness)
    }

    /// Villages whose owner doesn't belong to any kingdom (or isn't known).
    pub fn grey_villages(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.villages()
            .filter(|c| self.owner_of(c).and_then(|p| p.kingdom_id()).is_none())
    }

    pub fn unoccupied_oases(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.oases().filter(|c| c.owner_id().is_none())
    }

    /// Village cell matching either the village name or the cell id.
    pub fn village(&self, name: Option<&str>, id: Option<CellId>) -> Option<&Cell> {
        self.villages().find(|c| {
            id.is_some_and(|id| c.id == id) || name.is_some_and(|n| c.village_name() == Some(n))
        })
    }

    pub fn villages_of<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.villages().filter(move |c| c.owner_id() == Some(player_id))
    }

    pub fn owner_of(&self, cell: &Cell) -> Option<&Player> {
        cell.owner_id().and_then(|id| self.players.get(id))
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players().filter(|p| p.is_active())
    }

    pub fn inactive_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players().filter(|p| !p.is_active())
    }

    pub fn players_in<'a>(&'a self, kingdom_id: &'a str) -> impl Iterator<Item = &'a Player> + 'a {
        self.players().filter(move |p| p.kingdom_id() == Some(kingdom_id))
    }

    /// Player matching either the name or the id. First match wins.
    pub fn player(&self, name: Option<&str>, id: Option<&str>) -> Option<&Player> {
        self.players().find(|p| {
            id.is_some_and(|id| p.id == id) || name.is_some_and(|n| p.name() == Some(n))
        })
    }

    pub fn kingdoms(&self) -> impl Iterator<Item = &Kingdom> + '_ {
        self.kingdoms.values()
    }

    /// Kingdom matching either the tag or the id. First match wins.
    pub fn kingdom(&self, tag: Option<&str>, id: Option<&str>) -> Option<&Kingdom> {
        self.kingdoms().find(|k| {
            id.is_some_and(|id| k.id == id) || tag.is_some_and(|t| k.name() == Some(t))
        })
    }

    pub fn kingdom_of(&self, player: &Player) -> Option<&Kingdom> {
        player.kingdom_id().and_then(|id| self.kingdoms.get(id))
    }

    pub fn summary(&self) -> MapSummary {
        let mut summary = MapSummary {
            cells: self.cells.len(),
            grey_villages: self.grey_villages().count(),
            unoccupied_oases: self.unoccupied_oases().count(),
            players: self.players.len(),
            inactive_players: self.inactive_players().count(),
            kingdoms: self.kingdoms.len(),
            ..Default::default()
        };

        for cell in self.cells() {
            match classify(cell) {
                CellCategory::Village => summary.villages += 1,
                CellCategory::Oasis => summary.oases += 1,
                CellCategory::AbandonedValley => summary.abandoned_valleys += 1,
                CellCategory::Wilderness => summary.wilderness += 1,
            }
        }

        summary
    }

    /// Copy of this snapshot holding only the cells within `radius` of
    /// `origin` (boundary included). Players and kingdoms are kept whole so
    /// ownership lookups keep working on the slice.
    pub fn slice(&self, origin: &Position, radius: f64) -> Snapshot {
        let mut sliced = Snapshot {
            players: self.players.clone(),
            kingdoms: self.kingdoms.clone(),
            ..Default::default()
        };

        for (region, ids) in &self.regions {
            for cell in ids.iter().filter_map(|id| self.cells.get(id)) {
                if origin.distance(&cell.position()) <= radius {
                    sliced.insert_cell(*region, cell.clone());
                }
            }
        }

        sliced
    }
}
