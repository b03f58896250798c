//! Cache configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{CACHE_DEFAULT_MAX_ENTRIES, CACHE_DEFAULT_NAMESPACE, CACHE_DEFAULT_TTL_SECS};

/// Cache backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-memory cache (Moka)
    Moka,
    /// Distributed cache (Redis)
    Redis,
    /// Stores nothing
    Null,
}

impl CacheBackend {
    /// Registry name of the backend
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moka => "moka",
            Self::Redis => "redis",
            Self::Null => "null",
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the cache interceptor is registered at all
    pub enabled: bool,

    /// Cache backend
    pub provider: CacheBackend,

    /// Redis URL (for the Redis backend)
    pub redis_url: Option<String>,

    /// Maximum number of entries (for the Moka backend)
    pub max_entries: u64,

    /// TTL applied to operations tagged without an explicit policy
    pub default_ttl_secs: u64,

    /// Namespace prefixed to every cache key
    pub namespace: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: CacheBackend::Moka,
            redis_url: None,
            max_entries: CACHE_DEFAULT_MAX_ENTRIES,
            default_ttl_secs: CACHE_DEFAULT_TTL_SECS,
            namespace: CACHE_DEFAULT_NAMESPACE.to_string(),
        }
    }
}
