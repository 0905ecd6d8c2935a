use std::fs;
use std::path::{Path, PathBuf};

use hebbnet::network::NetworkConfig;
use hebbnet::protocol::DEFAULT_ADDR;
use hebbnet::world::WorldConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_TICK_PERIOD_MS: u64 = 10;
pub const MAX_TICK_PERIOD_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the platform data directory")]
    NoDataDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// What to do with an edit that arrives while a tick holds the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Wait for the tick to finish.
    #[default]
    Queue,
    /// Answer immediately with a `busy` error.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub listen_addr: String,
    pub tick_period_ms: u64,
    pub busy_policy: BusyPolicy,
    pub network: NetworkConfig,
    pub world: WorldConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_ADDR.to_string(),
            tick_period_ms: 100,
            busy_policy: BusyPolicy::Queue,
            network: NetworkConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let cfg: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_PERIOD_MS..=MAX_TICK_PERIOD_MS).contains(&self.tick_period_ms) {
            return Err(ConfigError::Invalid(format!(
                "tick_period_ms must be within {MIN_TICK_PERIOD_MS}..={MAX_TICK_PERIOD_MS}, got {}",
                self.tick_period_ms
            )));
        }
        self.network
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("network: {e}")))?;
        self.world
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("world: {e}")))?;
        Ok(())
    }
}
