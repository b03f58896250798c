//! Interception framework
//!
//! Operations carry [`Tag`]s naming pointcuts. An [`Interceptor`]
//! participates in exactly one pointcut; when a handler's dispatch table is
//! woven, every operation tagged with that pointcut is wrapped by it.
//!
//! Pointcuts match by identity of their `static` marker, never by name:
//!
//! ```ignore
//! pub static AUDIT: PointcutMarker = PointcutMarker::new("audit");
//!
//! OperationInfo::new::<Orders>("place").with_tag(Tag::new(&AUDIT));
//! ```

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use meete_domain::error::Result;
use serde_json::Value;

use super::dispatch::{Call, Invocation, OperationInfo};

/// Storage whose address identifies a pointcut
pub struct PointcutMarker {
    name: &'static str,
}

impl PointcutMarker {
    /// Create a marker; declare it as a `static`
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for PointcutMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointcutMarker({})", self.name)
    }
}

/// Identity of a pointcut
#[derive(Clone, Copy)]
pub struct Pointcut(&'static PointcutMarker);

impl Pointcut {
    /// Pointcut identified by `marker`
    pub fn of(marker: &'static PointcutMarker) -> Self {
        Self(marker)
    }

    /// Name of the underlying marker
    pub fn name(&self) -> &'static str {
        self.0.name
    }
}

impl From<&'static PointcutMarker> for Pointcut {
    fn from(marker: &'static PointcutMarker) -> Self {
        Self(marker)
    }
}

impl PartialEq for Pointcut {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Pointcut {}

impl Hash for Pointcut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state);
    }
}

impl fmt::Debug for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointcut({:p} {})", self.0, self.0.name)
    }
}

/// Membership of an operation in a pointcut, with optional typed options
#[derive(Clone)]
pub struct Tag {
    pointcut: Pointcut,
    options: Option<Arc<dyn Any + Send + Sync>>,
}

impl Tag {
    /// Tag without options
    pub fn new(marker: &'static PointcutMarker) -> Self {
        Self {
            pointcut: Pointcut::of(marker),
            options: None,
        }
    }

    /// Attach options read by the matching interceptor
    pub fn with_options<O: Any + Send + Sync>(mut self, options: O) -> Self {
        self.options = Some(Arc::new(options));
        self
    }

    /// Pointcut this tag references
    pub fn pointcut(&self) -> Pointcut {
        self.pointcut
    }

    /// Options of type `O`, if attached
    pub fn options<O: Any>(&self) -> Option<&O> {
        self.options.as_deref().and_then(|options| options.downcast_ref::<O>())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("pointcut", &self.pointcut)
            .field("has_options", &self.options.is_some())
            .finish()
    }
}

/// Cross-cutting behavior attached to one pointcut
///
/// `handle` either runs `next` (possibly with altered arguments) and
/// returns its result, or short-circuits with a substitute result.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Pointcut this interceptor participates in
    fn pointcut(&self) -> Pointcut;

    /// Position in a chain; lower values sit closer to the operation.
    /// Equal values keep registration order.
    fn order(&self) -> i32 {
        0
    }

    /// Wrap one call of a tagged operation
    async fn handle(&self, next: Next, invocation: Invocation) -> Result<Value>;
}

/// Continuation of an interceptor chain
#[derive(Clone)]
pub struct Next {
    info: Arc<OperationInfo>,
    call: Call,
}

impl Next {
    pub(crate) fn new(info: Arc<OperationInfo>, call: Call) -> Self {
        Self { info, call }
    }

    /// Operation being intercepted
    pub fn operation(&self) -> &OperationInfo {
        &self.info
    }

    /// Invoke the rest of the chain
    pub async fn run(self, invocation: Invocation) -> Result<Value> {
        (self.call)(invocation).await
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("operation", &self.info.method())
            .finish_non_exhaustive()
    }
}
