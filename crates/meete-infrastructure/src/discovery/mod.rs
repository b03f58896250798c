//! Service-name resolution

pub mod resolver;

pub use resolver::ServiceResolver;
