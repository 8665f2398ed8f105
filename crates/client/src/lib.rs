//! Demo client driving the shared session store.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ StoreRegistry (shared session stores, passed explicitly)
//!   ├─→ Observer task (logs every store change)
//!   └─→ Round driver (writes mode, difficulty, points and countdown)
//! ```
//!
//! The observer and the driver never talk to each other directly; both only
//! hold a handle to the same store, which is what keeps them in sync.

mod builder;
pub mod config;
pub mod logging;
pub mod round;

pub use builder::ClientBuilder;
pub use config::ClientConfig;
pub use round::{ObserverReport, RoundSummary};

use anyhow::{Context, Result};
use game_store::StoreRegistry;
use tokio::sync::oneshot;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. Client::builder() collects configuration and the registry
/// 2. Client::run() resets the configured store and starts the observer
/// 3. Client::run() plays one round on the store
/// 4. On completion the observer drains queued changes and stops, and the
///    summary carries how many changes it saw
pub struct Client {
    config: ClientConfig,
    registry: StoreRegistry,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Run one round.
    ///
    /// # Errors
    ///
    /// Returns an error if the observer task panicked.
    pub async fn run(self) -> Result<RoundSummary> {
        let store = self.registry.store(&self.config.store_name);
        store.reset();

        let (stop_tx, stop_rx) = oneshot::channel();
        let observer = tokio::spawn(round::observe_changes(store.subscribe_all(), stop_rx));

        let mut summary =
            round::play_round(&store, &self.config.difficulty, self.config.tick_interval).await;

        // Every write of the round is already queued; the observer drains
        // them before it returns.
        let _ = stop_tx.send(());
        let report = observer.await.context("store observer failed")?;
        tracing::debug!("Observer saw {} changes", report.observed);
        summary.changes_observed = report.observed;

        Ok(summary)
    }
}
