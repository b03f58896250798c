//! Authentication configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLIENT_INFO_URL, DEFAULT_USER_INFO_URL, INTROSPECTION_TIMEOUT_SECS};

/// Token introspection endpoints
///
/// A URL without an explicit port names a logical service and is
/// resolved through service discovery on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// User-info endpoint (credential sent as a bearer header)
    pub user_info_url: String,

    /// Token-check endpoint (credential sent as the `token` query parameter)
    pub client_info_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_info_url: DEFAULT_USER_INFO_URL.to_string(),
            client_info_url: DEFAULT_CLIENT_INFO_URL.to_string(),
            timeout_secs: INTROSPECTION_TIMEOUT_SECS,
        }
    }
}
