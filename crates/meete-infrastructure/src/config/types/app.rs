//! Root application configuration

use serde::{Deserialize, Serialize};

use super::{
    AuthConfig, CacheConfig, DiscoveryConfig, LoggingConfig, RoutingConfig, ServerConfig,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Cache interceptor and backend settings
    pub cache: CacheConfig,
    /// Token introspection endpoints
    pub auth: AuthConfig,
    /// Service discovery settings
    pub discovery: DiscoveryConfig,
    /// Handler group discovery settings
    pub routing: RoutingConfig,
}
