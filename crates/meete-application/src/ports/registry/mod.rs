//! Provider Registry System
//!
//! Defines the auto-registration infrastructure for plugin providers.
//! Uses the `linkme` crate for compile-time registration of providers
//! that can be discovered and instantiated at runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Provider Registration Flow                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Provider defines:  #[linkme::distributed_slice(PROVIDERS)]  │
//! │                        static ENTRY: ProviderEntry = ...        │
//! │                              ↓                                  │
//! │  2. Registry declares: #[linkme::distributed_slice]             │
//! │                        pub static PROVIDERS: [Entry] = [..]     │
//! │                              ↓                                  │
//! │  3. Resolver queries:  PROVIDERS.iter()                         │
//! │                              ↓                                  │
//! │  4. Config selects:    "provider = moka" → MokaCacheProvider    │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Registering a Provider (in meete-providers)
//!
//! ```ignore
//! use meete_application::ports::registry::{CacheProviderEntry, CACHE_PROVIDERS};
//!
//! #[linkme::distributed_slice(CACHE_PROVIDERS)]
//! static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
//!     name: "moka",
//!     description: "Moka in-memory cache",
//!     factory: |config| Ok(Arc::new(MokaCacheProvider::from_config(config))),
//! };
//! ```
//!
//! ### Resolving a Provider (in meete-infrastructure)
//!
//! ```ignore
//! use meete_application::ports::registry::resolve_cache_provider;
//!
//! let provider = resolve_cache_provider(&CacheProviderConfig::new("moka"))?;
//! ```

pub mod cache;
pub mod discovery;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
pub use discovery::{
    DISCOVERY_PROVIDERS, DiscoveryProviderConfig, DiscoveryProviderEntry,
    list_discovery_providers, resolve_discovery_provider,
};
