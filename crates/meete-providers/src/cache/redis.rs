//! Redis distributed cache provider
//!
//! Distributed cache implementation using Redis as the backend.
//! Suitable for multi-instance deployments. The database may be shared, so
//! `clear` and `stats` only touch keys under the provider's namespace.
//!
//! ## Example
//!
//! ```ignore
//! use meete_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379", "meete")?;
//! assert_eq!(provider.key_pattern(), "meete:*");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use meete_application::ports::registry::{CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry};
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};

use crate::constants::{CACHE_NAMESPACE_SEPARATOR, REDIS_SCAN_COUNT};

/// Redis cache provider
///
/// Uses multiplexed connections for efficient connection reuse.
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    pattern: String,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider with connection string
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `namespace` - Key prefix owned by this cache; empty owns every key
    pub fn new(connection_string: &str, namespace: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::infrastructure_with_source(format!("Failed to create Redis client: {e}"), e)
        })?;

        Ok(Self {
            client,
            pattern: key_pattern(namespace),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Glob matching the keys this provider owns
    pub fn key_pattern(&self) -> &str {
        &self.pattern
    }

    /// Get a connection from the pool
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                Error::infrastructure_with_source(format!("Failed to get Redis connection: {e}"), e)
            })
    }

    /// Every key matching [`Self::key_pattern`], walked with SCAN
    async fn owned_keys(&self, conn: &mut MultiplexedConnection) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&self.pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_COUNT)
                .query_async(conn)
                .await
                .map_err(|e| Error::infrastructure_with_source(format!("Redis SCAN failed: {e}"), e))?;
            keys.extend(batch);
            if next == 0 {
                return Ok(keys);
            }
            cursor = next;
        }
    }
}

/// SCAN glob for `namespace`, with glob metacharacters escaped
fn key_pattern(namespace: &str) -> String {
    if namespace.is_empty() {
        return "*".to_string();
    }
    let mut pattern = String::with_capacity(namespace.len() + 2);
    for ch in namespace.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push_str(CACHE_NAMESPACE_SEPARATOR);
    pattern.push('*');
    pattern
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => Err(Error::infrastructure_with_source(
                format!("Redis GET failed: {e}"),
                e,
            )),
        }
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let result: redis::RedisResult<()> = match config.effective_ttl() {
            Some(ttl) => conn.set_ex(key, value, ttl.as_secs().max(1)).await,
            None => conn.set(key, value).await,
        };

        result.map_err(|e| Error::infrastructure_with_source(format!("Redis SET failed: {e}"), e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let deleted: redis::RedisResult<i32> = conn.del(key).await;
        match deleted {
            Ok(count) => Ok(count > 0),
            Err(e) => Err(Error::infrastructure_with_source(
                format!("Redis DEL failed: {e}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let exists: redis::RedisResult<i32> = conn.exists(key).await;
        match exists {
            Ok(count) => Ok(count > 0),
            Err(e) => Err(Error::infrastructure_with_source(
                format!("Redis EXISTS failed: {e}"),
                e,
            )),
        }
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let keys = self.owned_keys(&mut conn).await?;
        for batch in keys.chunks(REDIS_SCAN_COUNT) {
            let _: i64 = conn
                .del(batch)
                .await
                .map_err(|e| Error::infrastructure_with_source(format!("Redis DEL failed: {e}"), e))?;
        }
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut conn = self.get_connection().await?;

        let entries = self.owned_keys(&mut conn).await?.len() as u64;

        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        })
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis distributed cache",
    factory: |config: &CacheProviderConfig| {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| "Redis cache provider requires a URI".to_string())?;
        let namespace = config.namespace.as_deref().unwrap_or_default();
        let provider = RedisCacheProvider::new(uri, namespace).map_err(|e| e.to_string())?;
        Ok(Arc::new(provider) as Arc<dyn CacheProvider>)
    },
};
