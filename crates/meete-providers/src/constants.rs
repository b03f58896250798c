//! Provider constants

/// Default entry limit for in-memory caches
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Separator between a cache namespace and the key it prefixes
pub const CACHE_NAMESPACE_SEPARATOR: &str = ":";

/// Keys fetched per SCAN round trip
pub const REDIS_SCAN_COUNT: usize = 500;

/// Consul catalog endpoint prefix, followed by the service name
pub const CONSUL_CATALOG_PATH: &str = "/v1/catalog/service/";

/// Default timeout for discovery lookups in seconds
pub const DISCOVERY_DEFAULT_TIMEOUT_SECS: u64 = 5;
