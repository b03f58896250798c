//! Service resolver
//!
//! A configured URL without an explicit port names a logical service: its
//! host is looked up in the discovery backend and replaced by the address
//! found. Lookups are cached with a TTL; concurrent misses for one name
//! may both query the backend, and the last insert wins.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::{ServiceAddress, ServiceDiscoveryProvider};
use moka::future::Cache;
use reqwest::Url;
use tracing::{debug, warn};

use crate::constants::{DISCOVERY_CACHE_MAX_ENTRIES, DISCOVERY_CACHE_TTL_SECS};

/// Resolves logical service URLs through an optional discovery backend
#[derive(Clone)]
pub struct ServiceResolver {
    provider: Option<Arc<dyn ServiceDiscoveryProvider>>,
    cache: Cache<String, ServiceAddress>,
}

impl ServiceResolver {
    /// Resolver over `provider`, caching addresses for `ttl`
    pub fn new(provider: Arc<dyn ServiceDiscoveryProvider>, ttl: Duration, max_entries: u64) -> Self {
        Self {
            provider: Some(provider),
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_entries)
                .build(),
        }
    }

    /// Resolver that leaves every URL unchanged
    pub fn disabled() -> Self {
        Self {
            provider: None,
            cache: Cache::builder()
                .time_to_live(Duration::from_secs(DISCOVERY_CACHE_TTL_SECS))
                .max_capacity(DISCOVERY_CACHE_MAX_ENTRIES)
                .build(),
        }
    }

    /// Whether a discovery backend is configured
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Address of one instance of `service`, cached
    pub async fn lookup(&self, service: &str) -> Result<Option<ServiceAddress>> {
        let Some(provider) = &self.provider else {
            return Ok(None);
        };
        if let Some(address) = self.cache.get(service).await {
            return Ok(Some(address));
        }

        let found = provider.lookup(service).await?;
        if let Some(address) = &found {
            debug!(service, host = %address.host, port = address.port, "Service resolved");
            self.cache.insert(service.to_string(), address.clone()).await;
        }
        Ok(found)
    }

    /// Rewrite `url` to a discovered address when it names a service
    ///
    /// URLs with an explicit port, URLs without a host, and services the
    /// backend does not know are returned unchanged. A port equal to the
    /// scheme's default counts as absent.
    pub async fn resolve_url(&self, url: &str) -> Result<String> {
        if !self.is_enabled() {
            return Ok(url.to_string());
        }

        let mut parsed = Url::parse(url)
            .map_err(|e| Error::invalid_argument(format!("Invalid service URL '{url}': {e}")))?;
        if parsed.port().is_some() {
            return Ok(url.to_string());
        }
        let Some(service) = parsed.host_str().map(ToString::to_string) else {
            return Ok(url.to_string());
        };

        let Some(address) = self.lookup(&service).await? else {
            warn!(service = %service, "Service not found in discovery, using URL as configured");
            return Ok(url.to_string());
        };

        parsed
            .set_host(Some(&address.host))
            .map_err(|e| Error::invalid_argument(format!("Invalid discovered host '{}': {e}", address.host)))?;
        parsed
            .set_port(Some(address.port))
            .map_err(|()| Error::invalid_argument(format!("Cannot set port on '{url}'")))?;
        Ok(parsed.to_string())
    }
}

impl fmt::Debug for ServiceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceResolver")
            .field(
                "provider",
                &self.provider.as_ref().map(|provider| provider.provider_name()),
            )
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}
