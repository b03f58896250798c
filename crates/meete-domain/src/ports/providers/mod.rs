//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | CacheProvider | Key-value store backing the cache interceptor |
//! | ServiceDiscoveryProvider | Logical service name to address lookup |
//! | TokenIntrospectionProvider | Bearer credential exchange with the authorization server |

/// Cache provider port
pub mod cache;
/// Service discovery port
pub mod discovery;
/// Token introspection port
pub mod introspection;

pub use cache::{CacheEntryConfig, CacheProvider, CacheStats};
pub use discovery::{ServiceAddress, ServiceDiscoveryProvider};
pub use introspection::TokenIntrospectionProvider;
