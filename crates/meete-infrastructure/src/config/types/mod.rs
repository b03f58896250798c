//! Configuration types module

pub mod app;
pub mod auth;
pub mod cache;
pub mod discovery;
pub mod logging;
pub mod routing;
pub mod server;

pub use app::AppConfig;
pub use auth::AuthConfig;
pub use cache::{CacheBackend, CacheConfig};
pub use discovery::{DiscoveryBackend, DiscoveryConfig};
pub use logging::LoggingConfig;
pub use routing::RoutingConfig;
pub use server::ServerConfig;
