//! Consul service discovery provider
//!
//! Queries the agent's catalog (`/v1/catalog/service/<name>`) and picks
//! one registered node at random. A node's `ServiceAddress` wins over its
//! agent `Address` when both are present.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meete_application::ports::registry::{
    DISCOVERY_PROVIDERS, DiscoveryProviderConfig, DiscoveryProviderEntry,
};
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::{ServiceAddress, ServiceDiscoveryProvider};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::debug;

use crate::constants::{CONSUL_CATALOG_PATH, DISCOVERY_DEFAULT_TIMEOUT_SECS};

/// One entry of a Consul catalog service listing
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogNode {
    /// Address of the node's agent
    #[serde(rename = "Address", default)]
    pub address: String,
    /// Address the service registered with, may be empty
    #[serde(rename = "ServiceAddress", default)]
    pub service_address: String,
    /// Port the service registered with
    #[serde(rename = "ServicePort")]
    pub service_port: u16,
}

impl CatalogNode {
    /// Address clients should connect to
    pub fn to_address(&self) -> ServiceAddress {
        let host = if self.service_address.is_empty() {
            &self.address
        } else {
            &self.service_address
        };
        ServiceAddress::new(host.clone(), self.service_port)
    }
}

/// Consul catalog backed discovery
#[derive(Debug, Clone)]
pub struct ConsulDiscoveryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ConsulDiscoveryProvider {
    /// Create a provider for the agent described by `config`
    pub fn new(config: &DiscoveryProviderConfig) -> Result<Self> {
        let timeout = config
            .timeout
            .unwrap_or(Duration::from_secs(DISCOVERY_DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network_with_source("Failed to build Consul HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Pick one node at random, `None` for an empty listing
    pub fn pick(nodes: &[CatalogNode]) -> Option<ServiceAddress> {
        nodes.choose(&mut rand::rng()).map(CatalogNode::to_address)
    }
}

#[async_trait]
impl ServiceDiscoveryProvider for ConsulDiscoveryProvider {
    async fn lookup(&self, service: &str) -> Result<Option<ServiceAddress>> {
        let url = format!("{}{CONSUL_CATALOG_PATH}{service}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            Error::network_with_source(format!("Consul catalog request failed: {url}"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!(
                "Consul catalog returned {status} for service '{service}'"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network_with_source("Failed to read Consul catalog response", e))?;
        let nodes: Vec<CatalogNode> = serde_json::from_str(&body)?;
        debug!(service, instances = nodes.len(), "Consul catalog lookup");

        Ok(Self::pick(&nodes))
    }

    fn provider_name(&self) -> &str {
        "consul"
    }
}

#[linkme::distributed_slice(DISCOVERY_PROVIDERS)]
static CONSUL_PROVIDER: DiscoveryProviderEntry = DiscoveryProviderEntry {
    name: "consul",
    description: "Consul catalog service discovery",
    factory: |config: &DiscoveryProviderConfig| {
        let provider = ConsulDiscoveryProvider::new(config).map_err(|e| e.to_string())?;
        Ok(Arc::new(provider) as Arc<dyn ServiceDiscoveryProvider>)
    },
};
