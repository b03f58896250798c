//! Meete application layer
//!
//! Provider registries populated at link time by `meete-providers`, the
//! principal extraction rules applied to token introspection payloads, and
//! the authentication use case every protected handler goes through.

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use use_cases::AuthenticationService;
