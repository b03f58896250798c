//! Value Objects
//!
//! Immutable types describing authenticated principals and the course
//! records served by the bundled handler groups.

/// Course records
pub mod course;
/// Authenticated principals
pub mod principal;

pub use course::Course;
pub use principal::{Client, Principal, User};
