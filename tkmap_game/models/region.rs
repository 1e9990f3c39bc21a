use std::collections::HashMap;

use tkmap_types::{
    errors::MapError,
    map::{AXIS_MAX, AXIS_MIN, CellId, Position},
};

/// Side of a region, in cells.
pub const REGION_SIZE: i32 = 7;
/// Regions span `-REGION_RADIUS..=REGION_RADIUS` on both axes of the coarse grid.
pub const REGION_RADIUS: i32 = 13;

/// A 7x7 block of cells, the unit the game server accepts for map requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Id of the region itself: the cell id of its coarse-grid coordinate.
    pub anchor: CellId,
    /// Coordinate on the coarse grid.
    pub position: Position,
    pub members: Vec<CellId>,
}

impl Region {
    fn new(position: Position) -> Result<Self, MapError> {
        let anchor = position.to_cell_id()?;
        let (min, _) = Self::corners(&position);

        let mut members = Vec::with_capacity((REGION_SIZE * REGION_SIZE) as usize);
        for x in min.x..min.x + REGION_SIZE {
            for y in min.y..min.y + REGION_SIZE {
                members.push(Position::new(x, y).to_cell_id()?);
            }
        }

        Ok(Self {
            anchor,
            position,
            members,
        })
    }

    fn corners(position: &Position) -> (Position, Position) {
        let min = Position::new(position.x * REGION_SIZE, position.y * REGION_SIZE);
        let max = Position::new(min.x + REGION_SIZE - 1, min.y + REGION_SIZE - 1);
        (min, max)
    }

    /// Lowest and highest cell coordinates covered by this region (inclusive).
    pub fn bounds(&self) -> (Position, Position) {
        Self::corners(&self.position)
    }

    pub fn contains(&self, position: &Position) -> bool {
        let (min, max) = self.bounds();
        (min.x..=max.x).contains(&position.x) && (min.y..=max.y).contains(&position.y)
    }

    /// Distance from `origin` to the closest cell of this region.
    pub fn distance_from(&self, origin: &Position) -> f64 {
        let (min, max) = self.bounds();
        let closest = Position::new(origin.x.clamp(min.x, max.x), origin.y.clamp(min.y, max.y));
        origin.distance(&closest)
    }
}

/// Static partition of the world into regions.
///
/// Built once and never mutated; whoever issues map requests owns one (usually
/// behind an `Arc`) and asks it which region ids to send.
#[derive(Debug, Clone)]
pub struct RegionPartition {
    regions: Vec<Region>,
    index: HashMap<CellId, usize>,
    radius: i32,
}

impl RegionPartition {
    /// Partition of the standard world: 27x27 regions covering `-91..=97`.
    pub fn new() -> Self {
        Self::with_radius(REGION_RADIUS)
            .expect("standard world regions always fit the coordinate range")
    }

    /// Partition covering `-radius..=radius` regions on both axes.
    pub fn with_radius(radius: i32) -> Result<Self, MapError> {
        let far = i64::from(REGION_SIZE) * i64::from(radius) + i64::from(REGION_SIZE) - 1;
        let near = -i64::from(REGION_SIZE) * i64::from(radius);
        if far > i64::from(AXIS_MAX) || near < i64::from(AXIS_MIN) {
            return Err(MapError::CoordinateOutOfRange { x: far, y: far });
        }

        let side = (2 * radius.max(0) + 1) as usize;
        let mut regions = Vec::with_capacity(side * side);

        for rx in -radius..=radius {
            for ry in -radius..=radius {
                regions.push(Region::new(Position::new(rx, ry))?);
            }
        }

        let index = regions
            .iter()
            .enumerate()
            .map(|(i, region)| (region.anchor, i))
            .collect();

        Ok(Self {
            regions,
            index,
            radius,
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.iter()
    }

    /// Every region id, always in the same order.
    pub fn region_ids(&self) -> Vec<CellId> {
        self.regions.iter().map(|r| r.anchor).collect()
    }

    pub fn region(&self, anchor: CellId) -> Option<&Region> {
        self.index.get(&anchor).map(|&i| &self.regions[i])
    }

    pub fn members_of(&self, anchor: CellId) -> Option<&[CellId]> {
        self.region(anchor).map(|r| r.members.as_slice())
    }

    /// Id of the region covering `position`, if the partition reaches it.
    pub fn region_of(&self, position: &Position) -> Option<CellId> {
        let rx = position.x.div_euclid(REGION_SIZE);
        let ry = position.y.div_euclid(REGION_SIZE);
        if rx.abs() > self.radius || ry.abs() > self.radius {
            return None;
        }

        let anchor = Position::new(rx, ry).to_cell_id().ok()?;
        self.index.contains_key(&anchor).then_some(anchor)
    }

    /// Ids of the regions having at least one cell within `radius` of `origin`.
    pub fn regions_around(&self, origin: &Position, radius: f64) -> Vec<CellId> {
        self.regions
            .iter()
            .filter(|r| r.distance_from(origin) <= radius)
            .map(|r| r.anchor)
            .collect()
    }
}

impl Default for RegionPartition {
    fn default() -> Self {
        Self::new()
    }
}
