//! Game client binary.
//!
//! Composition root: loads configuration, installs logging, builds the store
//! registry and plays one round against it.
//!
//! ```bash
//! GAME_TICK_MS=50 GAME_DIFFICULTY=hard cargo run -p game-client
//! ```

use anyhow::Result;
use game_client::{Client, ClientConfig, logging};
use game_store::{StoreConfig, StoreRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();
    let store_config = StoreConfig::from_env();

    // 2. Setup logging
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting game client");
    tracing::info!("Store: {}", config.store_name);
    tracing::info!("Tick interval: {:?}", config.tick_interval);

    // 3. Build and run
    let registry = StoreRegistry::new(store_config);
    let client = Client::builder().config(config).registry(registry).build()?;

    let summary = client.run().await?;
    tracing::info!(
        "Client shutdown complete: difficulty={:?}, points={}, ticks={}",
        summary.difficulty,
        summary.points,
        summary.ticks
    );
    Ok(())
}
