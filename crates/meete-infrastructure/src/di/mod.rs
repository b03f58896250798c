//! Dependency Injection System
//!
//! An explicit typed registry resolved by a graph walk. Every binding
//! declares the capability keys its factory may ask for, so the container
//! can reject cycles before constructing anything.
//!
//! ```text
//! Registry (bindings + ordered interceptors)
//!     │
//!     ▼
//! Container::resolve::<T>()
//!     ├── declared-graph cycle check ──► CyclicDependency
//!     ├── OnceCell per singleton key (single flight)
//!     └── factory(&Dependencies) ──► declared keys only
//!                                     └── undeclared ──► UnresolvedDependency
//! ```
//!
//! Handlers registered through [`Registry::handler`] also get a
//! [`DispatchTable`]: their operations wrapped, once, by every interceptor
//! whose pointcut one of the operation's tags references.

pub mod binding;
pub mod bootstrap;
pub mod container;
pub mod dependencies;
pub mod dispatch;
pub mod interception;
pub mod key;
pub mod registry;

pub use binding::{Binding, Instance, Lifecycle};
pub use bootstrap::{CACHE_INTERCEPTOR, build_container, register_infrastructure};
pub use container::Container;
pub use dependencies::Dependencies;
pub use dispatch::{DispatchTable, Invocation, MethodId, Operation, OperationInfo, Operations};
pub use interception::{Interceptor, Next, Pointcut, PointcutMarker, Tag};
pub use key::CapabilityKey;
pub use registry::Registry;
