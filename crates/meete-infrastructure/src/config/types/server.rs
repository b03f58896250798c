//! Server configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_TITLE, DEFAULT_API_VERSION, DEFAULT_BODY_LIMIT_KIB, DEFAULT_HTTP_PORT,
    DEFAULT_SERVER_HOST,
};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// API title reported by the health endpoint
    pub title: String,
    /// Free-form API description
    pub description: String,
    /// API version reported by the health endpoint
    pub version: String,
    /// Maximum accepted JSON body size in KiB
    pub body_limit_kib: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            title: DEFAULT_API_TITLE.to_string(),
            description: String::new(),
            version: DEFAULT_API_VERSION.to_string(),
            body_limit_kib: DEFAULT_BODY_LIMIT_KIB,
        }
    }
}
