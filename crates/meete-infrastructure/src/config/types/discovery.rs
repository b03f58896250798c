//! Service discovery configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{
    DISCOVERY_CACHE_MAX_ENTRIES, DISCOVERY_CACHE_TTL_SECS, DISCOVERY_DEFAULT_HOST,
    DISCOVERY_DEFAULT_PORT,
};

/// Discovery backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryBackend {
    /// Consul catalog
    Consul,
    /// No discovery, URLs pass through unchanged
    None,
}

impl DiscoveryBackend {
    /// Registry name of the backend
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consul => "consul",
            Self::None => "none",
        }
    }
}

/// Service discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Whether logical service names are resolved at all
    pub enabled: bool,
    /// Discovery backend
    pub provider: DiscoveryBackend,
    /// Agent host
    pub host: String,
    /// Agent port
    pub port: u16,
    /// Agent scheme
    pub scheme: String,
    /// Seconds a resolved address stays cached
    pub cache_ttl_secs: u64,
    /// Number of resolved addresses kept
    pub max_entries: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: DiscoveryBackend::Consul,
            host: DISCOVERY_DEFAULT_HOST.to_string(),
            port: DISCOVERY_DEFAULT_PORT,
            scheme: "http".to_string(),
            cache_ttl_secs: DISCOVERY_CACHE_TTL_SECS,
            max_entries: DISCOVERY_CACHE_MAX_ENTRIES,
        }
    }
}
