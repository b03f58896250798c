//! Capability keys

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a requestable capability
///
/// A key names a type contract (`CapabilityKey::of::<dyn CacheProvider>()`)
/// or a named contract sharing a type with others
/// (`CapabilityKey::named::<dyn Interceptor>("cache")`).
#[derive(Clone, Copy)]
pub struct CapabilityKey {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Option<&'static str>,
}

impl CapabilityKey {
    /// Key of a type contract
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            qualifier: None,
        }
    }

    /// Key of a named contract
    pub fn named<T: ?Sized + 'static>(qualifier: &'static str) -> Self {
        Self {
            qualifier: Some(qualifier),
            ..Self::of::<T>()
        }
    }

    /// Full type name of the contract
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Qualifier of a named contract
    pub fn qualifier(&self) -> Option<&'static str> {
        self.qualifier
    }

    /// Whether the key refers to type `T`, whatever its qualifier
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(qualifier) => write!(f, "{}[{qualifier}]", self.type_name),
            None => f.write_str(self.type_name),
        }
    }
}

impl fmt::Debug for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityKey({self})")
    }
}
