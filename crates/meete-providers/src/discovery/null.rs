//! Null service discovery provider

use std::sync::Arc;

use async_trait::async_trait;
use meete_application::ports::registry::{
    DISCOVERY_PROVIDERS, DiscoveryProviderConfig, DiscoveryProviderEntry,
};
use meete_domain::error::Result;
use meete_domain::ports::providers::{ServiceAddress, ServiceDiscoveryProvider};

/// Discovery backend that knows no service
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiscoveryProvider;

#[async_trait]
impl ServiceDiscoveryProvider for NullDiscoveryProvider {
    async fn lookup(&self, _service: &str) -> Result<Option<ServiceAddress>> {
        Ok(None)
    }

    fn provider_name(&self) -> &str {
        "none"
    }
}

#[linkme::distributed_slice(DISCOVERY_PROVIDERS)]
static NULL_PROVIDER: DiscoveryProviderEntry = DiscoveryProviderEntry {
    name: "none",
    description: "Discovery disabled, URLs are used as configured",
    factory: |_config: &DiscoveryProviderConfig| {
        Ok(Arc::new(NullDiscoveryProvider) as Arc<dyn ServiceDiscoveryProvider>)
    },
};
