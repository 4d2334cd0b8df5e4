//! geoip.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ceiling on decompressed body size (4 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 4 * 1024 * 1024;

/// Status code of a successful lookup reply.
pub const STATUS_HTTP_OK: u16 = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoIpConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Upper bound on the size of a decompressed body, in bytes.
    pub max_decompressed_size: usize,
    /// Status code that marks a reply as carrying records.
    pub success_status: u16,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            success_status: STATUS_HTTP_OK,
        }
    }
}

impl GeoIpConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GeoIpConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl DecoderConfig {
    /// Load the `[decoder]` table from a geoip.toml file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        Ok(GeoIpConfig::from_file(path)?.decoder)
    }
}
