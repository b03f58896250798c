//! Meete domain layer
//!
//! Error taxonomy, authenticated principals, value objects and the ports
//! that outer layers implement (cache backends, service discovery, token
//! introspection, course storage). Nothing in here performs I/O.

/// Domain constants
pub mod constants;
/// Error handling types
pub mod error;
/// Provider and repository ports
pub mod ports;
/// Repository ports
pub mod repositories;
/// Value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{Client, Course, Principal, User};
