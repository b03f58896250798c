//! Domain services
//!
//! Pure functions over introspection payloads.

pub mod claims;

pub use claims::{check_error, extract_authorities, extract_client, extract_user};
