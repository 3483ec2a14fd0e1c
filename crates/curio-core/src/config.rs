//! Sync configuration, loadable from TOML.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROBE_INTERVAL_SECS;
use crate::errors::{CurioError, CurioResult};

/// Tunables for the sync engine and connectivity monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between connectivity probes.
    pub probe_interval_secs: u64,
    /// Base URL of the remote API (used by the HTTP transport).
    pub remote_base_url: String,
    /// API key for the remote API, if required.
    pub remote_api_key: Option<String>,
    /// Attempt the remote write directly on local mutation when online,
    /// falling back to the queue on failure. When false, every mutation
    /// goes through the queue.
    pub direct_writes: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            remote_base_url: String::new(),
            remote_api_key: None,
            direct_writes: true,
        }
    }
}

impl SyncConfig {
    /// Parse a config from TOML text. Missing fields take defaults.
    pub fn from_toml_str(text: &str) -> CurioResult<Self> {
        toml::from_str(text).map_err(|e| CurioError::Config {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = SyncConfig::from_toml_str("probe_interval_secs = 5").unwrap();
        assert_eq!(cfg.probe_interval_secs, 5);
        assert!(cfg.direct_writes);
        assert!(cfg.remote_api_key.is_none());
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(SyncConfig::from_toml_str("probe_interval_secs = []").is_err());
    }
}
