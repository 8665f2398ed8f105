//! Client builder with dependency injection pattern.

use crate::{Client, ClientConfig};
use anyhow::{Context, Result};
use game_store::StoreRegistry;

/// Builder for constructing a Client with proper validation.
///
/// Configuration and registry are both required; the registry is injected
/// so the caller keeps its own handle to the same stores.
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    registry: Option<StoreRegistry>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client configuration (required).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the store registry (required).
    pub fn registry(mut self, registry: StoreRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or registry is missing.
    pub fn build(self) -> Result<Client> {
        let config = self
            .config
            .context("Config is required. Use .config() to set it.")?;

        let registry = self
            .registry
            .context("Registry is required. Use .registry() to set it.")?;

        Ok(Client { config, registry })
    }
}
