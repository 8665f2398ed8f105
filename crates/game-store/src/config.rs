//! Store configuration structures and loaders.
use std::env;

/// Settings applied to every store a registry creates.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Buffered changes per broadcast channel before slow receivers lag.
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

impl StoreConfig {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAME_STORE_CHANNEL_CAPACITY` - Broadcast capacity per field (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("GAME_STORE_CHANNEL_CAPACITY") {
            config.channel_capacity = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
