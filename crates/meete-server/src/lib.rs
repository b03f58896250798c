//! # Meete Server
//!
//! HTTP surface of the Meete backend. Handler groups declared in
//! [`handlers`] are discovered at startup, bound into the DI container,
//! woven with the registered interceptors and mounted on Rocket.
//!
//! ```text
//! ConfigLoader ─► register_infrastructure ─► GroupCollector
//!                                                 │
//!                        GroupDescriptor::register ◄┘
//!                                 │
//!            build_container (validate + eager resolution)
//!                                 │
//!                     materialize ─► rocket::Route ─► launch
//! ```
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Endpoint`] | Rocket handler forwarding a request to one operation |
//! | [`ApiError`] | Structured `{code, message, errors}` error response |

pub mod constants;
pub mod error;
pub mod handlers;
pub mod init;
pub mod materializer;

pub use error::{ApiError, ErrorBody};
pub use init::{assemble, build_rocket, run_server};
pub use materializer::{Endpoint, materialize};
