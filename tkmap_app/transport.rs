use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use tkmap_types::{errors::ApplicationError, map::CellId};

/// Group key the map endpoint echoes back in its response.
pub const REGION_GROUP: &str = "1";

/// Body of a `map.getByRegionIds` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRequest {
    #[serde(rename = "regionIdCollection")]
    pub region_id_collection: BTreeMap<String, Vec<u32>>,
}

impl RegionRequest {
    pub fn new(region_ids: &[CellId]) -> Self {
        let ids = region_ids.iter().map(CellId::as_u32).collect();
        Self {
            region_id_collection: BTreeMap::from([(REGION_GROUP.to_string(), ids)]),
        }
    }

    pub fn region_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.region_id_collection.values().flatten().copied()
    }
}

/// Body of a `cache.get` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheRequest {
    pub names: Vec<String>,
}

impl CacheRequest {
    pub fn single(name: String) -> Self {
        Self { names: vec![name] }
    }
}

/// The remote game API. Implementations own retries, timeouts and sessions;
/// callers just await the raw response body.
#[async_trait::async_trait]
pub trait MapTransport: Send + Sync {
    async fn get_by_region_ids(&self, request: &RegionRequest) -> Result<Value, ApplicationError>;
    async fn get_cache(&self, request: &CacheRequest) -> Result<Value, ApplicationError>;
}
