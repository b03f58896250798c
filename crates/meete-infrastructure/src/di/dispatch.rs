//! Operations and dispatch tables
//!
//! A handler exposes its callable surface as a list of [`Operation`]s.
//! The container turns that list into a [`DispatchTable`], wrapping
//! tagged operations with their interceptors exactly once.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use meete_domain::error::{Error, Result};
use meete_domain::value_objects::{Client, Principal, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::interception::{Interceptor, Next, Pointcut, Tag};

pub(crate) type Call = Arc<dyn Fn(Invocation) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Keyword argument carrying the authenticated principal
pub const PRINCIPAL_KWARG: &str = "principal";

/// Identity of an operation: owning type and method name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    owner: &'static str,
    name: &'static str,
}

impl MethodId {
    /// Method `name` of type `T`
    pub fn of<T: ?Sized>(name: &'static str) -> Self {
        Self {
            owner: type_name::<T>(),
            name,
        }
    }

    /// Full type name of the owner
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Method name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `path::to::Owner::method`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owner, self.name)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// Static description of an operation
#[derive(Debug, Clone)]
pub struct OperationInfo {
    method: MethodId,
    tags: Vec<Tag>,
}

impl OperationInfo {
    /// Describe method `name` of type `T`
    pub fn new<T: ?Sized>(name: &'static str) -> Self {
        Self {
            method: MethodId::of::<T>(name),
            tags: Vec::new(),
        }
    }

    /// Add a pointcut tag
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Method identity
    pub fn method(&self) -> &MethodId {
        &self.method
    }

    /// All tags in declaration order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// First tag referencing `pointcut`
    pub fn find_tag(&self, pointcut: Pointcut) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.pointcut() == pointcut)
    }

    /// Whether any tag references `pointcut`
    pub fn matches(&self, pointcut: Pointcut) -> bool {
        self.find_tag(pointcut).is_some()
    }
}

/// Arguments of one call
///
/// Values arriving from the request boundary are strings; typed accessors
/// fall back to parsing a string as JSON so `"5"` reads as `5_i64`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// Positional arguments
    pub args: Vec<Value>,
    /// Keyword arguments
    pub kwargs: Map<String, Value>,
}

impl Invocation {
    /// Empty invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    #[must_use]
    pub fn with_arg<V: Into<Value>>(mut self, value: V) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set a keyword argument
    #[must_use]
    pub fn with_kwarg<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Attach the authenticated principal
    pub fn with_principal(mut self, principal: &Principal) -> Result<Self> {
        self.kwargs
            .insert(PRINCIPAL_KWARG.to_string(), encode(principal)?);
        Ok(self)
    }

    /// Positional argument `index` decoded as `T`
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self
            .args
            .get(index)
            .ok_or_else(|| Error::invalid_argument(format!("Missing argument #{index}")))?;
        decode(value, &format!("argument #{index}"))
    }

    /// Keyword argument decoded as `T`, `None` when absent
    pub fn kwarg<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.kwargs
            .get(name)
            .map(|value| decode(value, &format!("argument '{name}'")))
            .transpose()
    }

    /// Authenticated principal, if the route required one
    pub fn principal(&self) -> Result<Option<Principal>> {
        self.kwargs
            .get(PRINCIPAL_KWARG)
            .map(|value| serde_json::from_value(value.clone()).map_err(Error::from))
            .transpose()
    }

    /// Authenticated user or `Unauthenticated`
    pub fn user(&self) -> Result<User> {
        match self.principal()? {
            Some(Principal::User(user)) => Ok(user),
            _ => Err(Error::unauthenticated_default()),
        }
    }

    /// Authenticated client or `Unauthenticated`
    pub fn client(&self) -> Result<Client> {
        match self.principal()? {
            Some(Principal::Client(client)) => Ok(client),
            _ => Err(Error::unauthenticated_default()),
        }
    }
}

fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(err) => match value {
            Value::String(raw) => serde_json::from_str(raw)
                .map_err(|_| Error::invalid_argument(format!("Invalid {what}: {err}"))),
            _ => Err(Error::invalid_argument(format!("Invalid {what}: {err}"))),
        },
    }
}

/// Callable entry of a delegate table
#[derive(Clone)]
pub struct Operation {
    info: Arc<OperationInfo>,
    call: Call,
}

impl Operation {
    /// Bind `method` to `target`
    ///
    /// ```ignore
    /// Operation::bind(&self, OperationInfo::new::<Self>("get"), |this, inv| async move {
    ///     this.get(inv.arg(0)?).await
    /// })
    /// ```
    pub fn bind<T, F, Fut, R>(target: &Arc<T>, info: OperationInfo, method: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: Serialize + Send + 'static,
    {
        let target = Arc::clone(target);
        let call: Call = Arc::new(move |invocation: Invocation| {
            let pending = method(Arc::clone(&target), invocation);
            async move {
                let output = pending.await?;
                encode(&output)
            }
            .boxed()
        });
        Self {
            info: Arc::new(info),
            call,
        }
    }

    /// Static description
    pub fn info(&self) -> &OperationInfo {
        &self.info
    }

    /// Method name
    pub fn name(&self) -> &'static str {
        self.info.method().name()
    }

    /// Run the operation through its interceptor chain
    pub async fn call(&self, invocation: Invocation) -> Result<Value> {
        (self.call)(invocation).await
    }

    fn wrapped(self, interceptor: Arc<dyn Interceptor>) -> Self {
        let next = Next::new(Arc::clone(&self.info), self.call);
        let call: Call = Arc::new(move |invocation: Invocation| {
            let interceptor = Arc::clone(&interceptor);
            let next = next.clone();
            async move { interceptor.handle(next, invocation).await }.boxed()
        });
        Self {
            info: self.info,
            call,
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Types exposing a delegate table of operations
pub trait Operations: Send + Sync + 'static {
    /// Bind every operation of this instance, in declaration order
    fn operations(self: Arc<Self>) -> Vec<Operation>;
}

/// Delegate table of one handler instance
#[derive(Debug)]
pub struct DispatchTable {
    owner: &'static str,
    operations: Vec<Operation>,
    woven: bool,
}

impl DispatchTable {
    /// Table over explicit operations
    pub fn new(owner: &'static str, operations: Vec<Operation>) -> Self {
        Self {
            owner,
            operations,
            woven: false,
        }
    }

    /// Table over the operations of `target`
    pub fn of<T: Operations>(target: Arc<T>) -> Self {
        Self::new(type_name::<T>(), target.operations())
    }

    /// Wrap tagged operations with matching interceptors
    ///
    /// `interceptors` must already be in chain order; the first one ends up
    /// innermost. Returns `false` without touching anything when the table
    /// was woven before.
    pub fn weave(&mut self, interceptors: &[Arc<dyn Interceptor>]) -> bool {
        if self.woven {
            return false;
        }
        self.woven = true;

        self.operations = std::mem::take(&mut self.operations)
            .into_iter()
            .map(|operation| {
                let matching: Vec<Arc<dyn Interceptor>> = interceptors
                    .iter()
                    .filter(|interceptor| operation.info().matches(interceptor.pointcut()))
                    .cloned()
                    .collect();
                if !matching.is_empty() {
                    debug!(
                        operation = %operation.info().method(),
                        interceptors = matching.len(),
                        "Operation wrapped"
                    );
                }
                matching
                    .into_iter()
                    .fold(operation, |wrapped, interceptor| wrapped.wrapped(interceptor))
            })
            .collect();
        true
    }

    /// Whether interceptors were applied
    pub fn is_woven(&self) -> bool {
        self.woven
    }

    /// Type name of the handler
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Operation called `name`
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|operation| operation.name() == name)
    }

    /// Operation names in declaration order
    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(Operation::name).collect()
    }

    /// Call operation `name`
    pub async fn invoke(&self, name: &str, invocation: Invocation) -> Result<Value> {
        let operation = self
            .operation(name)
            .ok_or_else(|| Error::not_found(format!("Operation {}::{name}", self.owner)))?;
        operation.call(invocation).await
    }
}

/// Server-side value as JSON; failures are internal, not caller errors
fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| Error::internal(format!("Cannot encode {}: {err}", type_name::<T>())))
}
