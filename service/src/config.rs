//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use staking_rewards::PoolConfig;

use crate::logging::LogFormat;
use crate::ServiceError;

/// Configuration for a staking pool service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Display name of the staked/reward asset.
    #[serde(default = "default_asset_name")]
    pub asset_name: String,

    /// Ticker of the staked/reward asset.
    #[serde(default = "default_asset_symbol")]
    pub asset_symbol: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pool parameters: rate, owner, custody address, solvency horizon.
    /// Kept last so it serializes as a trailing `[pool]` table.
    #[serde(default)]
    pub pool: PoolConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_asset_name() -> String {
    "Stake Token".to_string()
}

fn default_asset_symbol() -> String {
    "STK".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            asset_name: default_asset_name(),
            asset_symbol: default_asset_symbol(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            pool: PoolConfig::default(),
        }
    }
}
