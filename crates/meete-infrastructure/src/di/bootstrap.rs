//! DI Container Bootstrap - Composition Root
//!
//! Registers the infrastructure capabilities every deployment needs. Handler
//! groups are registered afterwards by the server, once route discovery has
//! run, so they can depend on anything bound here.
//!
//! ```text
//! AppConfig ─► CacheProvider (linkme registry) ─► CacheInterceptor["cache"]
//!          ├─► ServiceResolver (linkme registry) ─► TokenIntrospectionProvider
//!          │                                          └─► AuthenticationService
//!          └─► CourseRepository
//! ```

use std::sync::Arc;
use std::time::Duration;

use meete_application::AuthenticationService;
use meete_application::ports::registry::{
    CacheProviderConfig, DiscoveryProviderConfig, resolve_cache_provider,
    resolve_discovery_provider,
};
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::{CacheProvider, TokenIntrospectionProvider};
use meete_domain::repositories::CourseRepository;
use meete_providers::repository::InMemoryCourseRepository;
use tracing::info;

use super::container::Container;
use super::key::CapabilityKey;
use super::registry::Registry;
use crate::auth::HttpTokenIntrospection;
use crate::cache::CacheInterceptor;
use crate::config::{AppConfig, DiscoveryBackend};
use crate::discovery::ServiceResolver;

/// Qualifier of the cache interceptor binding
pub const CACHE_INTERCEPTOR: &str = "cache";

/// Bind the infrastructure capabilities described by `config`
pub fn register_infrastructure(registry: &Registry, config: &AppConfig) {
    let app_config = registry.instance::<AppConfig>(Arc::new(config.clone()));

    let cache_provider = registry.singleton::<dyn CacheProvider, _>(&[app_config], |deps| {
        let config = deps.get::<AppConfig>()?;
        let mut provider_config = CacheProviderConfig::new(config.cache.provider.as_str())
            .with_max_entries(config.cache.max_entries)
            .with_namespace(config.cache.namespace.as_str());
        if let Some(url) = &config.cache.redis_url {
            provider_config = provider_config.with_uri(url.clone());
        }
        let provider = resolve_cache_provider(&provider_config)
            .map_err(|e| Error::configuration(format!("Cache provider: {e}")))?;
        info!(provider = provider.provider_name(), "Cache provider ready");
        Ok(provider)
    });

    let resolver = registry.singleton::<ServiceResolver, _>(&[app_config], |deps| {
        let config = deps.get::<AppConfig>()?;
        let discovery = &config.discovery;
        if !discovery.enabled || discovery.provider == DiscoveryBackend::None {
            return Ok(Arc::new(ServiceResolver::disabled()));
        }
        let provider_config = DiscoveryProviderConfig::new(discovery.provider.as_str())
            .with_agent(discovery.host.clone(), discovery.port)
            .with_scheme(discovery.scheme.clone());
        let provider = resolve_discovery_provider(&provider_config)
            .map_err(|e| Error::configuration(format!("Discovery provider: {e}")))?;
        info!(
            provider = provider.provider_name(),
            agent = %provider_config.base_url(),
            "Service discovery ready"
        );
        Ok(Arc::new(ServiceResolver::new(
            provider,
            Duration::from_secs(discovery.cache_ttl_secs),
            discovery.max_entries,
        )))
    });

    let introspection = registry.singleton::<dyn TokenIntrospectionProvider, _>(
        &[app_config, resolver],
        |deps| {
            let config = deps.get::<AppConfig>()?;
            let resolver = deps.get::<ServiceResolver>()?;
            let provider = HttpTokenIntrospection::new(&config.auth, resolver)?;
            Ok(Arc::new(provider) as Arc<dyn TokenIntrospectionProvider>)
        },
    );

    registry.singleton::<AuthenticationService, _>(&[introspection], |deps| {
        let introspection = deps.get::<dyn TokenIntrospectionProvider>()?;
        Ok(Arc::new(AuthenticationService::new(introspection)))
    });

    if config.cache.enabled {
        registry.interceptor::<CacheInterceptor, _>(
            CACHE_INTERCEPTOR,
            &[app_config, cache_provider],
            |deps| {
                let config = deps.get::<AppConfig>()?;
                let provider = deps.get::<dyn CacheProvider>()?;
                Ok(Arc::new(
                    CacheInterceptor::new(provider, config.cache.namespace.clone())
                        .with_default_ttl(Duration::from_secs(config.cache.default_ttl_secs)),
                ))
            },
        );
    }

    registry.singleton::<dyn CourseRepository, _>(&[], |_| {
        Ok(Arc::new(InMemoryCourseRepository::new()) as Arc<dyn CourseRepository>)
    });

    info!(bindings = registry.len(), "Infrastructure bindings registered");
}

/// Wrap a populated registry in a container and check its wiring
///
/// Every key listed in `eager` is resolved immediately so configuration
/// and wiring defects surface at startup instead of on the first request.
pub fn build_container(registry: Arc<Registry>, eager: &[CapabilityKey]) -> Result<Container> {
    let container = Container::new(registry);
    container.validate()?;
    for key in eager {
        container.instantiate(*key, &[])?;
    }
    Ok(container)
}
