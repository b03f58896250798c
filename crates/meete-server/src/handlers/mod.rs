//! Handler groups mounted by the server
//!
//! Each group registers itself in `HANDLER_GROUPS` under its module path,
//! so discovery from `meete_server::handlers` finds all of them.

pub mod clients;
pub mod courses;
pub mod health;
pub mod users;

pub use clients::ClientHandlers;
pub use courses::CourseHandlers;
pub use health::HealthHandlers;
pub use users::UserHandlers;
