//! Domain Port Interfaces
//!
//! Boundary contracts implemented by the provider and infrastructure
//! layers. High-level code depends on these traits only.

/// External service provider ports
pub mod providers;

pub use providers::{
    CacheEntryConfig, CacheProvider, CacheStats, ServiceAddress, ServiceDiscoveryProvider,
    TokenIntrospectionProvider,
};
