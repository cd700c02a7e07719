use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub feeds: FeedConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Window sizes for the live views. Both default to the most recent 20.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_window")]
    pub session_window: usize,
    #[serde(default = "default_window")]
    pub roster_window: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_change_capacity")]
    pub change_capacity: usize,
}

fn default_window() -> usize {
    20
}

fn default_change_capacity() -> usize {
    64
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            session_window: default_window(),
            roster_window: default_window(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            change_capacity: default_change_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: FeedConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // All files are optional; built-in defaults cover a bare setup.
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // Env overrides, e.g. GATELINK__FEEDS__ROSTER_WINDOW=50
            .add_source(config::Environment::with_prefix("GATELINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
