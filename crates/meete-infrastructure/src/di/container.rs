//! Container: resolves capability keys into instances
//!
//! Resolution of a key first walks the declared dependency graph reachable
//! from it and fails with `CyclicDependency` on any cycle, so no factory
//! runs for a graph that cannot complete. Singletons are built inside a
//! per-key `OnceCell`; concurrent first resolutions wait for the one
//! construction instead of building twice.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use meete_domain::error::{Error, Result};
use once_cell::sync::OnceCell;
use tracing::debug;

use super::binding::{Binding, Instance, Lifecycle, downcast};
use super::dependencies::Dependencies;
use super::dispatch::{DispatchTable, Operations};
use super::interception::Interceptor;
use super::key::CapabilityKey;
use super::registry::Registry;

/// Dependency injection container
#[derive(Debug)]
pub struct Container {
    registry: Arc<Registry>,
    instances: DashMap<CapabilityKey, Arc<OnceCell<Instance>>>,
}

impl Container {
    /// Create a container over a registry
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            instances: DashMap::new(),
        }
    }

    /// Registry backing this container
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Resolve the type contract `T`
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve_key(CapabilityKey::of::<T>())
    }

    /// Resolve the named contract `T[qualifier]`
    pub fn resolve_named<T: ?Sized + Send + Sync + 'static>(&self, qualifier: &'static str) -> Result<Arc<T>> {
        self.resolve_key(CapabilityKey::named::<T>(qualifier))
    }

    /// Resolve any key
    pub fn resolve_key<T: ?Sized + Send + Sync + 'static>(&self, key: CapabilityKey) -> Result<Arc<T>> {
        let instance = self.instantiate(key, &[])?;
        downcast::<T>(key, &instance)
    }

    /// Woven dispatch table of handler `T`
    pub fn dispatch<T: Operations>(&self) -> Result<Arc<DispatchTable>> {
        self.resolve_key(Registry::dispatch_key::<T>())
    }

    /// Registered interceptors sorted by `(order, registration)`
    pub fn interceptors(&self) -> Result<Vec<Arc<dyn Interceptor>>> {
        self.interceptors_within(&[])
    }

    /// Check every binding for cycles and undeclared registrations
    ///
    /// Meant for startup, so wiring defects stop the process before it
    /// serves anything.
    pub fn validate(&self) -> Result<()> {
        for key in self.registry.keys() {
            self.ensure_acyclic(key)?;
            if let Some(binding) = self.registry.binding(&key) {
                if let Some(missing) = binding
                    .dependencies()
                    .iter()
                    .find(|dependency| !self.registry.contains(dependency))
                {
                    return Err(Error::unresolved(*missing, Some(key.to_string())));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn interceptors_within(
        &self,
        chain: &[CapabilityKey],
    ) -> Result<Vec<Arc<dyn Interceptor>>> {
        let mut interceptors = self
            .registry
            .interceptor_keys()
            .into_iter()
            .map(|key| {
                let instance = self.instantiate(key, chain)?;
                downcast::<dyn Interceptor>(key, &instance)
            })
            .collect::<Result<Vec<_>>>()?;
        // Stable: equal orders keep registration order
        interceptors.sort_by_key(|interceptor| interceptor.order());
        Ok(interceptors)
    }

    pub(crate) fn instantiate(&self, key: CapabilityKey, chain: &[CapabilityKey]) -> Result<Instance> {
        if let Some(instance) = self.cached(key) {
            return Ok(instance);
        }
        if let Some(position) = chain.iter().position(|seen| *seen == key) {
            return Err(cycle(&chain[position..], key));
        }

        let binding = self
            .registry
            .binding(&key)
            .ok_or_else(|| Error::unresolved(key, chain.last().map(ToString::to_string)))?;
        self.ensure_acyclic(key)?;

        let mut chain = chain.to_vec();
        chain.push(key);

        match binding.lifecycle() {
            Lifecycle::Transient => self.construct(&binding, chain),
            Lifecycle::Singleton => {
                let cell = Arc::clone(
                    self.instances
                        .entry(key)
                        .or_insert_with(|| Arc::new(OnceCell::new()))
                        .value(),
                );
                cell.get_or_try_init(|| self.construct(&binding, chain))
                    .cloned()
            }
        }
    }

    fn cached(&self, key: CapabilityKey) -> Option<Instance> {
        let cell = self.instances.get(&key).map(|entry| Arc::clone(entry.value()))?;
        cell.get().cloned()
    }

    fn construct(&self, binding: &Binding, chain: Vec<CapabilityKey>) -> Result<Instance> {
        debug!(key = %binding.key(), lifecycle = ?binding.lifecycle(), "Constructing capability");
        let deps = Dependencies::new(self, binding, chain);
        binding.construct(&deps)
    }

    /// Depth-first walk of the declared graph from `root`
    ///
    /// Unregistered keys end a branch; asking for them later reports
    /// `UnresolvedDependency` instead.
    fn ensure_acyclic(&self, root: CapabilityKey) -> Result<()> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        self.visit(root, &mut path, &mut done)
    }

    fn visit(
        &self,
        key: CapabilityKey,
        path: &mut Vec<CapabilityKey>,
        done: &mut HashSet<CapabilityKey>,
    ) -> Result<()> {
        if let Some(position) = path.iter().position(|seen| *seen == key) {
            return Err(cycle(&path[position..], key));
        }
        if done.contains(&key) {
            return Ok(());
        }
        if let Some(binding) = self.registry.binding(&key) {
            path.push(key);
            for dependency in self.registry.edges(&binding) {
                self.visit(dependency, path, done)?;
            }
            path.pop();
        }
        done.insert(key);
        Ok(())
    }
}

fn cycle(path: &[CapabilityKey], repeated: CapabilityKey) -> Error {
    let mut chain: Vec<String> = path.iter().map(ToString::to_string).collect();
    chain.push(repeated.to_string());
    Error::cyclic_dependency(chain)
}
