use std::{ops::Deref, sync::Arc};

use tracing::info;

use tkmap_game::models::{region::RegionPartition, snapshot::Snapshot};
use tkmap_types::{
    Result,
    map::{CellId, Position},
};

use crate::{
    payload::decode_regions,
    transport::{MapTransport, RegionRequest},
};

/// The world map as seen by one client.
///
/// Queries go through the wrapped [`Snapshot`] (it derefs to it). Pulls take
/// `&mut self`, so a map has a single writer; a failed pull leaves the
/// snapshot exactly as it was.
pub struct WorldMap {
    transport: Arc<dyn MapTransport>,
    partition: Arc<RegionPartition>,
    snapshot: Snapshot,
}

impl WorldMap {
    pub fn new(transport: Arc<dyn MapTransport>) -> Self {
        Self::with_partition(transport, Arc::new(RegionPartition::new()))
    }

    pub fn with_partition(transport: Arc<dyn MapTransport>, partition: Arc<RegionPartition>) -> Self {
        Self {
            transport,
            partition,
            snapshot: Snapshot::new(),
        }
    }

    pub fn partition(&self) -> &RegionPartition {
        &self.partition
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub(crate) fn transport(&self) -> &dyn MapTransport {
        self.transport.as_ref()
    }

    /// Fetches the given regions in a single request and merges what comes
    /// back. Returns how many cells the response carried.
    pub async fn pull(&mut self, region_ids: &[CellId]) -> Result<usize> {
        if region_ids.is_empty() {
            return Ok(0);
        }

        let request = RegionRequest::new(region_ids);
        let body = self.transport.get_by_region_ids(&request).await?;
        let staged = decode_regions(&body)?;
        let cells = staged.len();

        self.snapshot.merge(staged);
        info!(
            regions = region_ids.len(),
            cells,
            total = self.snapshot.len(),
            "Pulled map regions"
        );

        Ok(cells)
    }

    /// Fetches every region of the partition.
    pub async fn pull_all(&mut self) -> Result<usize> {
        let region_ids = self.partition.region_ids();
        self.pull(&region_ids).await
    }

    /// Fetches only the regions with at least one cell within `radius` of `origin`.
    pub async fn pull_around(&mut self, origin: &Position, radius: f64) -> Result<usize> {
        let region_ids = self.partition.regions_around(origin, radius);
        self.pull(&region_ids).await
    }

    /// New map holding only the cells within `radius` of `origin`.
    ///
    /// Never touches the network. The slice shares this map's transport and
    /// partition, so detail calls and later pulls work on it too.
    pub fn slice(&self, origin: &Position, radius: f64) -> WorldMap {
        WorldMap {
            transport: Arc::clone(&self.transport),
            partition: Arc::clone(&self.partition),
            snapshot: self.snapshot.slice(origin, radius),
        }
    }
}

impl Deref for WorldMap {
    type Target = Snapshot;

    fn deref(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Same as [`WorldMap::slice`].
pub fn slice_map(origin: &Position, radius: f64, map: &WorldMap) -> WorldMap {
    map.slice(origin, radius)
}
