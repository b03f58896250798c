//! Null cache provider
//!
//! Accepts writes and forgets them. Every lookup misses, so a cached
//! operation behaves as if it were not cached at all.

use std::sync::Arc;

use async_trait::async_trait;
use meete_application::ports::registry::{CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry};
use meete_domain::error::Result;
use meete_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};

/// Cache provider that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::new())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "No-op cache, every lookup misses",
    factory: |_config: &CacheProviderConfig| {
        Ok(Arc::new(NullCacheProvider::new()) as Arc<dyn CacheProvider>)
    },
};
