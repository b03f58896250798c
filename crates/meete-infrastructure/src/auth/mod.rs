//! Token introspection over HTTP

pub mod introspection;

pub use introspection::HttpTokenIntrospection;
