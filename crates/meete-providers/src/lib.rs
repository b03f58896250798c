//! Meete provider implementations
//!
//! Concrete adapters for the domain ports. Each provider registers itself
//! into the matching `meete_application::ports::registry` slice so the
//! infrastructure layer can select it by name from configuration.
//!
//! | Module | Providers |
//! |--------|-----------|
//! | [`cache`] | Moka, Redis, Null |
//! | [`discovery`] | Consul, None |
//! | [`repository`] | In-memory course repository |

pub mod cache;
pub mod constants;
pub mod discovery;
pub mod repository;
