//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_store::DEFAULT_STORE_NAME;

/// Configuration required to drive a round against the session store.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Registry name of the session store.
    pub store_name: String,
    /// Interval between countdown ticks.
    pub tick_interval: Duration,
    /// Difficulty label written to the store when the round starts.
    pub difficulty: String,
    /// Directory for a daily rolling log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            tick_interval: Duration::from_millis(1000),
            difficulty: "normal".to_string(),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAME_STORE_NAME` - Registry name of the store (default: game-store)
    /// - `GAME_TICK_MS` - Countdown tick interval in milliseconds (default: 1000)
    /// - `GAME_DIFFICULTY` - Difficulty label for the round (default: normal)
    /// - `GAME_LOG_DIR` - Directory for log files (default: stderr only)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = env::var("GAME_STORE_NAME")
            && !name.is_empty()
        {
            config.store_name = name;
        }

        if let Some(millis) = read_env::<u64>("GAME_TICK_MS") {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }

        if let Ok(difficulty) = env::var("GAME_DIFFICULTY") {
            config.difficulty = difficulty;
        }

        config.log_dir = env::var("GAME_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = name.into();
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
