//! Route collection
//!
//! Handler groups declare their prefix, tags and routes in code and
//! register themselves in [`HANDLER_GROUPS`]. Discovery walks the module
//! tree built from that slice and yields every group once, however many
//! names or aliases reach it.

pub mod descriptor;
pub mod discovery;
pub mod group;
pub mod template;

pub use descriptor::{Access, HttpMethod, ResponseMeta, Route, RouteDescriptor};
pub use discovery::{GroupCollector, ModuleTree};
pub use group::{
    GroupDeclaration, GroupDescriptor, HANDLER_GROUPS, HandlerGroup, HandlerGroupEntry, describe,
    describe_registered,
};
pub use template::{PathTemplate, Segment};
