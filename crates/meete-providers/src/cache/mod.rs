//! Cache Provider Implementations
//!
//! Backing stores for the cache interceptor.
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullCacheProvider`] | Testing | Stores nothing, every lookup misses |
//! | [`MokaCacheProvider`] | Local | In-memory cache with per-entry TTL |
//! | [`RedisCacheProvider`] | Distributed | Redis-backed for multi-instance |

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-moka")]
pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;

pub use meete_domain::ports::providers::cache::{CacheEntryConfig, CacheStats};
