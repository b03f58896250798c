//! Service Discovery Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`ConsulDiscoveryProvider`] | Consul catalog lookups, random instance per call |
//! | [`NullDiscoveryProvider`] | Knows no service, URLs stay unchanged |

#[cfg(feature = "discovery-consul")]
pub mod consul;
pub mod null;

#[cfg(feature = "discovery-consul")]
pub use consul::ConsulDiscoveryProvider;
pub use null::NullDiscoveryProvider;
