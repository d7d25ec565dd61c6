//! Static process configuration.
//!
//! Loaded once from a TOML file at startup. Everything here is deployment
//! shape — where the guild settings document lives, which banner the store
//! notices carry, which channels the uper panel points readers at. Per-guild
//! mutable settings live in [`crate::state::GuildStore`].

use balcao_platform::ChannelId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Storage locations.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Panel content configuration.
    #[serde(default)]
    pub panels: PanelConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Storage locations.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the per-guild settings document.
    #[serde(default = "default_guilds_file")]
    pub guilds_file: PathBuf,
}

fn default_guilds_file() -> PathBuf {
    PathBuf::from("guilds.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            guilds_file: default_guilds_file(),
        }
    }
}

/// Panel content configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelConfig {
    /// Banner image attached to store notices (purchase panels, payment
    /// instructions, broadcasts). Sent without the banner if the upload
    /// fails.
    #[serde(default)]
    pub store_banner: Option<PathBuf>,

    /// Channel listing service prices, referenced by the uper panel.
    #[serde(default)]
    pub uper_prices_channel: Option<ChannelId>,
    /// Channel holding the terms and conditions.
    #[serde(default)]
    pub uper_terms_channel: Option<ChannelId>,
    /// Channel where deliveries are announced.
    #[serde(default)]
    pub uper_delivery_channel: Option<ChannelId>,
    /// Channel listing the serviced regions.
    #[serde(default)]
    pub uper_regions_channel: Option<ChannelId>,
}
