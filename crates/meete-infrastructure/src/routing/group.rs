//! Handler groups
//!
//! A handler group is a type whose operations answer the routes it
//! declares under one prefix. Declaring a group also makes it a
//! singleton capability: its constructor dependencies are bound through
//! [`Registry::handler`], which gives it a woven dispatch table.
//!
//! ```ignore
//! impl HandlerGroup for CourseHandlers {
//!     const NAME: &'static str = "courses";
//!
//!     fn declare() -> GroupDeclaration {
//!         GroupDeclaration::new("/courses")
//!             .tag("courses")
//!             .route(Route::get("/{course_id}", "get"))
//!     }
//!     // ...
//! }
//!
//! #[linkme::distributed_slice(HANDLER_GROUPS)]
//! static COURSES: HandlerGroupEntry = HandlerGroupEntry::of::<CourseHandlers>(module_path!());
//! ```

use std::fmt;
use std::sync::Arc;

use meete_domain::error::{Error, Result};

use super::descriptor::{Route, RouteDescriptor};
use super::template::PathTemplate;
use crate::di::{CapabilityKey, Dependencies, Operations, Registry};

/// Prefix, tags and routes of a group
#[derive(Debug, Clone, Default)]
pub struct GroupDeclaration {
    prefix: String,
    tags: Vec<String>,
    routes: Vec<Route>,
}

impl GroupDeclaration {
    /// Declaration mounted at `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tags: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Add a documentation tag shared by every route
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a route; declaration order is mounting order
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }
}

/// A routable, dependency-injected handler type
pub trait HandlerGroup: Operations + Sized {
    /// Unique group name
    const NAME: &'static str;

    /// Prefix, tags and routes
    fn declare() -> GroupDeclaration;

    /// Keys `construct` may resolve
    fn dependencies() -> Vec<CapabilityKey> {
        Vec::new()
    }

    /// Build the handler from its declared dependencies
    fn construct(deps: &Dependencies<'_>) -> Result<Self>;
}

/// Everything the materializer needs about one group
#[derive(Clone)]
pub struct GroupDescriptor {
    /// Group name
    pub name: &'static str,
    /// Key of the handler singleton
    pub handler: CapabilityKey,
    /// Key of the handler's dispatch table
    pub dispatch: CapabilityKey,
    /// Mount prefix
    pub prefix: String,
    /// Documentation tags
    pub tags: Vec<String>,
    /// Routes in declaration order
    pub routes: Vec<RouteDescriptor>,
    register: fn(&Registry) -> CapabilityKey,
}

impl GroupDescriptor {
    /// Bind the handler and its dispatch table into `registry`
    pub fn register(&self, registry: &Registry) -> CapabilityKey {
        (self.register)(registry)
    }
}

impl fmt::Debug for GroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupDescriptor")
            .field("name", &self.name)
            .field("handler", &self.handler)
            .field("prefix", &self.prefix)
            .field("tags", &self.tags)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

fn register_group<G: HandlerGroup>(registry: &Registry) -> CapabilityKey {
    registry.handler::<G, _>(&G::dependencies(), |deps| G::construct(deps).map(Arc::new))
}

/// Validate and freeze the declaration of `G`
pub fn describe<G: HandlerGroup>() -> Result<GroupDescriptor> {
    let declaration = G::declare();

    let prefix = PathTemplate::parse(&declaration.prefix)?;
    if !prefix.is_static() {
        return Err(Error::invalid_argument(format!(
            "Prefix '{prefix}' of group '{}' cannot bind parameters",
            G::NAME
        )));
    }

    let routes = declaration
        .routes
        .into_iter()
        .map(Route::describe)
        .collect::<Result<Vec<_>>>()?;

    Ok(GroupDescriptor {
        name: G::NAME,
        handler: CapabilityKey::of::<G>(),
        dispatch: Registry::dispatch_key::<G>(),
        prefix: prefix.angle_path(),
        tags: declaration.tags,
        routes,
        register: register_group::<G>,
    })
}

/// Link-time registration of a handler group
pub struct HandlerGroupEntry {
    /// Group name
    pub name: &'static str,
    /// Module the group is declared in, as given by `module_path!()`
    pub module: &'static str,
    /// Descriptor constructor
    pub describe: fn() -> Result<GroupDescriptor>,
}

impl HandlerGroupEntry {
    /// Entry for group `G` declared in `module`
    pub const fn of<G: HandlerGroup>(module: &'static str) -> Self {
        Self {
            name: G::NAME,
            module,
            describe: describe::<G>,
        }
    }
}

impl fmt::Debug for HandlerGroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerGroupEntry")
            .field("name", &self.name)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

#[linkme::distributed_slice]
pub static HANDLER_GROUPS: [HandlerGroupEntry] = [..];

/// Descriptor of the registered group called `name`
///
/// Fails with `NotARouter` when no group was registered under that name.
pub fn describe_registered(name: &str) -> Result<GroupDescriptor> {
    HANDLER_GROUPS
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| Error::not_a_router(name))
        .and_then(|entry| (entry.describe)())
}
