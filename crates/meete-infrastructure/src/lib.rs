//! Meete infrastructure layer
//!
//! Cross-cutting technical concerns shared by every handler group:
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`config`] | Figment-based layered configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`error_ext`] | Context helpers for foreign errors |
//! | [`di`] | Capability registry, container, dispatch tables and interception |
//! | [`cache`] | Cache pointcut and interceptor |
//! | [`discovery`] | Service-name resolution with a TTL cache |
//! | [`auth`] | HTTP token introspection |
//! | [`routing`] | Route descriptors and handler group discovery |

pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod di;
pub mod discovery;
pub mod error_ext;
pub mod logging;
pub mod routing;

pub use config::AppConfig;
pub use di::{CapabilityKey, Container, Dependencies, Registry};
