//! Use cases

pub mod authentication;

pub use authentication::AuthenticationService;
