//! Service Discovery Port

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Network location of one instance of a logical service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceAddress {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl ServiceAddress {
    /// Create a service address
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Looks up logical service names in a discovery backend
///
/// `Ok(None)` means the backend answered but knows no instance.
#[async_trait]
pub trait ServiceDiscoveryProvider: Send + Sync + std::fmt::Debug {
    /// Find one instance of the named service
    async fn lookup(&self, service: &str) -> Result<Option<ServiceAddress>>;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}
