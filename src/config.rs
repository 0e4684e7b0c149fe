//! Binary configuration from the environment.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::SimpleRng;
use crate::store::StoreConfig;

/// Launch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    /// Fixed deal seed (`MEMORY_MATCH_SEED`). Unset means time-seeded.
    pub seed: Option<u32>,
    /// Write a log file into the data directory (`MEMORY_MATCH_LOG`).
    pub log_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            seed: None,
            log_enabled: true,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let seed = env::var("MEMORY_MATCH_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let log_enabled = env::var("MEMORY_MATCH_LOG")
            .map(|s| parse_switch(&s))
            .unwrap_or(true);

        Self {
            store: StoreConfig::from_env(),
            seed,
            log_enabled,
        }
    }

    pub fn rng(&self) -> SimpleRng {
        SimpleRng::new(self.seed.unwrap_or_else(time_seed))
    }
}

fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
