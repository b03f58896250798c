//! Application ports
//!
//! The provider traits themselves live in `meete_domain::ports`; this
//! module re-exports them next to the registries that resolve them.

pub mod registry;

pub use meete_domain::ports::providers;
