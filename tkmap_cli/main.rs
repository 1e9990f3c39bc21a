use std::sync::Arc;

use tkmap_app::{WorldMap, config::Config};
use tkmap_http::HttpTransport;
use tkmap_types::{Result, errors::ApplicationError};

mod logs;
use logs::setup_logging;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    setup_logging();

    let config = Config::from_env();
    let transport = Arc::new(HttpTransport::new(&config)?);
    let mut map = WorldMap::new(transport);

    map.pull_all().await?;
    tracing::info!(summary = %serde_json::to_string(&map.summary())?, "World map loaded");

    if let Some(focus) = config.focus {
        let around = map.slice(&focus, config.focus_radius);
        tracing::info!(
            focus = %focus,
            radius = config.focus_radius,
            summary = %serde_json::to_string(&around.summary())?,
            "Area around focus"
        );
    }

    Ok(())
}
