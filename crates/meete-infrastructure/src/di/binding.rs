//! Bindings: construction rule, lifecycle and declared dependencies

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use meete_domain::error::{Error, Result};

use super::dependencies::Dependencies;
use super::key::CapabilityKey;

/// A constructed capability, type-erased
///
/// Always holds an `Arc<T>` for the binding's contract `T`, which lets
/// trait-object contracts share one representation with concrete types.
pub type Instance = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn(&Dependencies<'_>) -> Result<Instance> + Send + Sync>;

/// How long a constructed instance lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// One instance shared for the container's lifetime
    Singleton,
    /// A fresh instance per resolution
    Transient,
}

/// Rule telling the container how to construct a capability
pub struct Binding {
    key: CapabilityKey,
    lifecycle: Lifecycle,
    dependencies: Vec<CapabilityKey>,
    uses_interceptors: bool,
    factory: Factory,
}

impl Binding {
    /// Create a binding whose factory produces `Arc<T>`
    pub fn new<T, F>(
        key: CapabilityKey,
        lifecycle: Lifecycle,
        dependencies: Vec<CapabilityKey>,
        factory: F,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            key,
            lifecycle,
            dependencies,
            uses_interceptors: false,
            factory: Arc::new(move |deps| factory(deps).map(|value| Arc::new(value) as Instance)),
        }
    }

    /// Let the factory read the registered interceptors
    ///
    /// Every interceptor binding becomes an implicit dependency.
    pub fn with_interceptors(mut self) -> Self {
        self.uses_interceptors = true;
        self
    }

    /// Key this binding is registered under
    pub fn key(&self) -> CapabilityKey {
        self.key
    }

    /// Lifecycle of constructed instances
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Keys the factory may request
    pub fn dependencies(&self) -> &[CapabilityKey] {
        &self.dependencies
    }

    /// Whether the factory reads the interceptor list
    pub fn uses_interceptors(&self) -> bool {
        self.uses_interceptors
    }

    pub(crate) fn construct(&self, deps: &Dependencies<'_>) -> Result<Instance> {
        (self.factory)(deps)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("lifecycle", &self.lifecycle)
            .field("dependencies", &self.dependencies)
            .field("uses_interceptors", &self.uses_interceptors)
            .finish_non_exhaustive()
    }
}

/// Recover the typed handle stored in an instance
pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(
    key: CapabilityKey,
    instance: &Instance,
) -> Result<Arc<T>> {
    (**instance)
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| {
            Error::internal(format!(
                "Binding for {key} produced a value that is not {}",
                std::any::type_name::<T>()
            ))
        })
}
