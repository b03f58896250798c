//! Infrastructure layer constants
//!
//! Domain-specific constants live in `meete_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "meete.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "meete";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "MEETE";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "MEETE_LOG";

// ============================================================================
// HTTP SERVER CONSTANTS
// ============================================================================

/// Default server host
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default HTTP server port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default API title
pub const DEFAULT_API_TITLE: &str = "Meete";

/// Default API version
pub const DEFAULT_API_VERSION: &str = "0.1.0";

/// Default request body limit in KiB
pub const DEFAULT_BODY_LIMIT_KIB: u64 = 1024;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default TTL in seconds for cached operations tagged without a policy
pub const CACHE_DEFAULT_TTL_SECS: u64 = 60;

/// Default maximum number of cache entries
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Default cache key namespace
pub const CACHE_DEFAULT_NAMESPACE: &str = "meete";

/// Cache namespace separator
pub use meete_providers::constants::CACHE_NAMESPACE_SEPARATOR;

// ============================================================================
// AUTHENTICATION CONSTANTS
// ============================================================================

/// Default user-info endpoint
pub const DEFAULT_USER_INFO_URL: &str = "http://localhost:8080/userinfo";

/// Default token-check endpoint
pub const DEFAULT_CLIENT_INFO_URL: &str = "http://localhost:8080/oauth/check_token";

/// Default introspection timeout in seconds
pub const INTROSPECTION_TIMEOUT_SECS: u64 = 10;

/// Authorization header name
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Bearer authentication scheme
pub const BEARER_SCHEME: &str = "Bearer";

/// Query parameter carrying the credential on token checks
pub const TOKEN_QUERY_PARAM: &str = "token";

// ============================================================================
// SERVICE DISCOVERY CONSTANTS
// ============================================================================

/// Default discovery agent host
pub const DISCOVERY_DEFAULT_HOST: &str = "localhost";

/// Default discovery agent port (Consul HTTP API)
pub const DISCOVERY_DEFAULT_PORT: u16 = 8500;

/// Default TTL of resolved service addresses in seconds
pub const DISCOVERY_CACHE_TTL_SECS: u64 = 60;

/// Default number of resolved service addresses kept
pub const DISCOVERY_CACHE_MAX_ENTRIES: u64 = 10;

// ============================================================================
// ROUTING CONSTANTS
// ============================================================================

/// Module path whose handler groups are mounted by default
pub const DEFAULT_ROUTING_PACKAGE: &str = "meete_server::handlers";

/// Module roots never walked during handler group discovery
pub const DEFAULT_IGNORED_NAMESPACES: [&str; 6] = ["std", "core", "alloc", "tokio", "rocket", "serde"];

/// Default response description of declared routes
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "Successful Response";
