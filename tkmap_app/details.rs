use serde_json::Value;
use tracing::debug;

use tkmap_game::models::{cell::Cell, player::Player};
use tkmap_types::{Result, errors::TransportError};

use crate::{transport::CacheRequest, world_map::WorldMap};

impl WorldMap {
    /// Extra information the server keeps about a cell (`MapDetails:<id>`).
    pub async fn cell_details(&self, cell: &Cell) -> Result<Value> {
        self.cache_entry(format!("MapDetails:{}", cell.id)).await
    }

    /// Public profile of a player (`Player:<id>`).
    pub async fn player_details(&self, player: &Player) -> Result<Value> {
        self.cache_entry(format!("Player:{}", player.id())).await
    }

    /// Items worn by a player's hero.
    pub async fn hero_equipment(&self, player: &Player) -> Result<Value> {
        let mut collection = self
            .cache_entry(format!("Collection:HeroItem:{}", player.id()))
            .await?;
        // collections nest their items in a second `cache` list
        let items = collection
            .get_mut("cache")
            .map(Value::take)
            .ok_or_else(|| TransportError::MalformedResponse("collection without `cache`".to_string()))?;
        Ok(items)
    }

    async fn cache_entry(&self, name: String) -> Result<Value> {
        debug!(name = name.as_str(), "Requesting cache entry");
        let body = self.transport().get_cache(&CacheRequest::single(name)).await?;
        Ok(unwrap_cache(body)?)
    }
}

/// Takes `cache[0].data` out of a `cache.get` response.
pub fn unwrap_cache(mut body: Value) -> Result<Value, TransportError> {
    body.pointer_mut("/cache/0/data")
        .map(Value::take)
        .ok_or_else(|| TransportError::MalformedResponse("missing `cache[0].data`".to_string()))
}
