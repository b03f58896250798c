//! Capability registry
//!
//! Process-wide table of bindings. Registering a key that already has a
//! binding replaces it, which is how tests swap production providers for
//! doubles. Bindings can be added at any time, including from inside a
//! factory while the container is resolving.

use std::any::type_name;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use meete_domain::error::Result;
use tracing::debug;

use super::binding::{Binding, Lifecycle};
use super::dependencies::Dependencies;
use super::dispatch::{DispatchTable, Operations};
use super::interception::Interceptor;
use super::key::CapabilityKey;

/// Table of bindings and ordered interceptor registrations
#[derive(Debug, Default)]
pub struct Registry {
    bindings: DashMap<CapabilityKey, Arc<Binding>>,
    interceptors: DashMap<CapabilityKey, usize>,
    sequence: AtomicUsize,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a binding
    pub fn register(&self, binding: Binding) -> CapabilityKey {
        let key = binding.key();
        let lifecycle = binding.lifecycle();
        if self.bindings.insert(key, Arc::new(binding)).is_some() {
            debug!(%key, ?lifecycle, "Binding replaced");
        } else {
            debug!(%key, ?lifecycle, "Binding registered");
        }
        key
    }

    /// Bind `T` to a factory whose product is shared
    pub fn singleton<T, F>(&self, dependencies: &[CapabilityKey], factory: F) -> CapabilityKey
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(Binding::new::<T, F>(
            CapabilityKey::of::<T>(),
            Lifecycle::Singleton,
            dependencies.to_vec(),
            factory,
        ))
    }

    /// Bind the named contract `T[qualifier]` to a shared product
    pub fn singleton_named<T, F>(
        &self,
        qualifier: &'static str,
        dependencies: &[CapabilityKey],
        factory: F,
    ) -> CapabilityKey
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(Binding::new::<T, F>(
            CapabilityKey::named::<T>(qualifier),
            Lifecycle::Singleton,
            dependencies.to_vec(),
            factory,
        ))
    }

    /// Bind `T` to a factory called on every resolution
    pub fn transient<T, F>(&self, dependencies: &[CapabilityKey], factory: F) -> CapabilityKey
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(Binding::new::<T, F>(
            CapabilityKey::of::<T>(),
            Lifecycle::Transient,
            dependencies.to_vec(),
            factory,
        ))
    }

    /// Bind `T` to an already constructed value
    pub fn instance<T>(&self, value: Arc<T>) -> CapabilityKey
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.singleton::<T, _>(&[], move |_| Ok(Arc::clone(&value)))
    }

    /// Bind handler `T` as a singleton together with its dispatch table
    ///
    /// Returns the key of the dispatch table, which is built from the
    /// handler's operations and woven with the registered interceptors the
    /// first time it is resolved.
    pub fn handler<T, F>(&self, dependencies: &[CapabilityKey], factory: F) -> CapabilityKey
    where
        T: Operations,
        F: Fn(&Dependencies<'_>) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let handler_key = self.singleton::<T, F>(dependencies, factory);
        let dispatch_key = Self::dispatch_key::<T>();
        self.register(
            Binding::new::<DispatchTable, _>(
                dispatch_key,
                Lifecycle::Singleton,
                vec![handler_key],
                |deps| {
                    let handler = deps.get::<T>()?;
                    let interceptors = deps.interceptors()?;
                    let mut table = DispatchTable::of(handler);
                    table.weave(&interceptors);
                    debug!(
                        handler = table.owner(),
                        operations = table.names().len(),
                        "Dispatch table built"
                    );
                    Ok(Arc::new(table))
                },
            )
            .with_interceptors(),
        )
    }

    /// Add an interceptor under `qualifier`
    ///
    /// Interceptors keep their registration order; re-registering a
    /// qualifier replaces the interceptor and moves it to the end.
    pub fn interceptor<I, F>(
        &self,
        qualifier: &'static str,
        dependencies: &[CapabilityKey],
        factory: F,
    ) -> CapabilityKey
    where
        I: Interceptor + 'static,
        F: Fn(&Dependencies<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        let key = CapabilityKey::named::<dyn Interceptor>(qualifier);
        self.register(Binding::new::<dyn Interceptor, _>(
            key,
            Lifecycle::Singleton,
            dependencies.to_vec(),
            move |deps| factory(deps).map(|interceptor| interceptor as Arc<dyn Interceptor>),
        ));
        let position = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.interceptors.insert(key, position);
        key
    }

    /// Key of the dispatch table registered for handler `T`
    pub fn dispatch_key<T: Operations>() -> CapabilityKey {
        CapabilityKey::named::<DispatchTable>(type_name::<T>())
    }

    /// Interceptor keys in registration order
    pub fn interceptor_keys(&self) -> Vec<CapabilityKey> {
        let mut keys: Vec<(usize, CapabilityKey)> = self
            .interceptors
            .iter()
            .map(|entry| (*entry.value(), *entry.key()))
            .collect();
        keys.sort_by_key(|(position, _)| *position);
        keys.into_iter().map(|(_, key)| key).collect()
    }

    /// Binding registered under `key`
    pub fn binding(&self, key: &CapabilityKey) -> Option<Arc<Binding>> {
        self.bindings.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Keys the binding's factory may request, interceptors included
    pub fn edges(&self, binding: &Binding) -> Vec<CapabilityKey> {
        let mut edges = binding.dependencies().to_vec();
        if binding.uses_interceptors() {
            edges.extend(self.interceptor_keys());
        }
        edges
    }

    /// Whether `key` has a binding
    pub fn contains(&self, key: &CapabilityKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// All registered keys
    pub fn keys(&self) -> Vec<CapabilityKey> {
        self.bindings.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is registered
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
