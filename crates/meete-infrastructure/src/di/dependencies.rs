//! Dependency view handed to factories

use std::sync::Arc;

use meete_domain::error::{Error, Result};

use super::binding::{Binding, downcast};
use super::container::Container;
use super::interception::Interceptor;
use super::key::CapabilityKey;
use super::registry::Registry;

/// What a factory may resolve while constructing its binding
///
/// Only the keys the binding declared are reachable; anything else fails
/// with `UnresolvedDependency` naming the requesting binding.
pub struct Dependencies<'a> {
    container: &'a Container,
    binding: &'a Binding,
    chain: Vec<CapabilityKey>,
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(container: &'a Container, binding: &'a Binding, chain: Vec<CapabilityKey>) -> Self {
        Self {
            container,
            binding,
            chain,
        }
    }

    /// Resolve the declared type contract `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get_key(CapabilityKey::of::<T>())
    }

    /// Resolve the declared named contract `T[qualifier]`
    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, qualifier: &'static str) -> Result<Arc<T>> {
        self.get_key(CapabilityKey::named::<T>(qualifier))
    }

    /// Resolve a declared key
    pub fn get_key<T: ?Sized + Send + Sync + 'static>(&self, key: CapabilityKey) -> Result<Arc<T>> {
        if !self.binding.dependencies().contains(&key) {
            return Err(Error::unresolved(key, Some(self.owner().to_string())));
        }
        let instance = self.container.instantiate(key, &self.chain)?;
        downcast::<T>(key, &instance)
    }

    /// Registered interceptors in chain order
    ///
    /// Only available to bindings created `with_interceptors`.
    pub fn interceptors(&self) -> Result<Vec<Arc<dyn Interceptor>>> {
        if !self.binding.uses_interceptors() {
            return Err(Error::unresolved(
                CapabilityKey::of::<dyn Interceptor>(),
                Some(self.owner().to_string()),
            ));
        }
        self.container.interceptors_within(&self.chain)
    }

    /// Registry, for bindings that register further bindings
    pub fn registry(&self) -> &Arc<Registry> {
        self.container.registry()
    }

    /// Key of the binding being constructed
    pub fn owner(&self) -> CapabilityKey {
        self.binding.key()
    }
}
