//! Name-addressed access to shared stores.
//!
//! The registry is constructed once by the composition root and handed to
//! every consumer. The first request for a name creates its store; later
//! requests return the same instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::StoreConfig;
use crate::store::GameStore;

/// Name the game front-end registers its session store under.
pub const DEFAULT_STORE_NAME: &str = "game-store";

#[derive(Clone, Debug, Default)]
pub struct StoreRegistry {
    config: StoreConfig,
    stores: Arc<Mutex<HashMap<String, GameStore>>>,
}

impl StoreRegistry {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            stores: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the store registered under `name`, creating it on first use.
    pub fn store(&self, name: &str) -> GameStore {
        let mut stores = self.lock();
        if let Some(store) = stores.get(name) {
            return store.clone();
        }

        tracing::debug!("Creating store '{}'", name);
        let store = GameStore::with_config(&self.config);
        stores.insert(name.to_string(), store.clone());
        store
    }

    /// Returns the store registered under [`DEFAULT_STORE_NAME`].
    pub fn default_store(&self) -> GameStore {
        self.store(DEFAULT_STORE_NAME)
    }

    /// Looks up a store without creating it.
    pub fn get(&self, name: &str) -> Option<GameStore> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Unregisters a store.
    ///
    /// Handles already given out keep working; the next [`StoreRegistry::store`]
    /// call for `name` creates a fresh store.
    pub fn remove(&self, name: &str) -> Option<GameStore> {
        let removed = self.lock().remove(name);
        if removed.is_some() {
            tracing::debug!("Removed store '{}'", name);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, GameStore>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
