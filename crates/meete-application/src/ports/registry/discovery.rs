//! Service Discovery Provider Registry

use std::sync::Arc;
use std::time::Duration;

use meete_domain::ports::providers::ServiceDiscoveryProvider;

/// Configuration for discovery provider creation
#[derive(Debug, Clone)]
pub struct DiscoveryProviderConfig {
    /// Provider name (e.g., "consul", "none")
    pub provider: String,
    /// Discovery agent host
    pub host: String,
    /// Discovery agent port
    pub port: u16,
    /// Scheme used to reach the agent
    pub scheme: String,
    /// Per-request timeout for lookups
    pub timeout: Option<Duration>,
}

impl DiscoveryProviderConfig {
    /// Create a new config with the given provider name and local agent defaults
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            host: "localhost".to_string(),
            port: 8500,
            scheme: "http".to_string(),
            timeout: None,
        }
    }

    /// Set the agent host and port
    pub fn with_agent(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the scheme
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the lookup timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL of the discovery agent
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Registry entry for discovery providers
pub struct DiscoveryProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&DiscoveryProviderConfig) -> Result<Arc<dyn ServiceDiscoveryProvider>, String>,
}

#[linkme::distributed_slice]
pub static DISCOVERY_PROVIDERS: [DiscoveryProviderEntry] = [..];

/// Resolve discovery provider by name from registry
pub fn resolve_discovery_provider(
    config: &DiscoveryProviderConfig,
) -> Result<Arc<dyn ServiceDiscoveryProvider>, String> {
    let provider_name = &config.provider;

    for entry in DISCOVERY_PROVIDERS {
        if entry.name == provider_name {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = DISCOVERY_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown discovery provider '{provider_name}'. Available providers: {available:?}"
    ))
}

/// List all registered discovery providers as (name, description) tuples
pub fn list_discovery_providers() -> Vec<(&'static str, &'static str)> {
    DISCOVERY_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
