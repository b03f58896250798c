//! Cache interceptor
//!
//! For a tagged call the interceptor computes a key from the method
//! identity and the arguments, answers from the backend when an entry
//! exists, and otherwise runs the call and stores its JSON result.
//!
//! Backend and serialization failures are not recovered here; they fail
//! the wrapped call like any other error. The exists/get/set sequence is
//! not atomic, so concurrent misses on one key may both compute and both
//! store.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::CACHE_NAMESPACE_SEPARATOR;
use crate::di::{Interceptor, Invocation, MethodId, Next, Pointcut, PointcutMarker, Tag};

/// Pointcut served by [`CacheInterceptor`]
pub static CACHE: PointcutMarker = PointcutMarker::new("cache");

/// Maps a call to its cache key
pub type KeyGenerator = fn(&MethodId, &[Value], &Map<String, Value>) -> String;

/// Per-operation caching options carried by the tag
#[derive(Clone)]
pub struct CachePolicy {
    /// Entry lifetime; `None` keeps the entry until evicted
    pub ttl: Option<Duration>,
    /// Key derivation
    pub key_generator: KeyGenerator,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: None,
            key_generator: default_key_generator,
        }
    }
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Tag an operation as cached with the default key generator
pub fn cached(ttl: Option<Duration>) -> Tag {
    cached_with(ttl, default_key_generator)
}

/// Tag an operation as cached with a custom key generator
pub fn cached_with(ttl: Option<Duration>, key_generator: KeyGenerator) -> Tag {
    Tag::new(&CACHE).with_options(CachePolicy { ttl, key_generator })
}

/// Qualified method name followed by the JSON of the arguments
///
/// JSON arrays and objects are self-delimiting, so distinct argument
/// tuples always give distinct keys.
pub fn default_key_generator(method: &MethodId, args: &[Value], kwargs: &Map<String, Value>) -> String {
    format!(
        "{}{}{}",
        method.qualified_name(),
        Value::Array(args.to_vec()),
        Value::Object(kwargs.clone())
    )
}

/// Serves `CACHE`-tagged operations from a cache backend
pub struct CacheInterceptor {
    provider: Arc<dyn CacheProvider>,
    namespace: String,
    default_ttl: Option<Duration>,
}

impl CacheInterceptor {
    /// Create an interceptor over `provider`, prefixing keys with `namespace`
    pub fn new(provider: Arc<dyn CacheProvider>, namespace: impl Into<String>) -> Self {
        Self {
            provider,
            namespace: namespace.into(),
            default_ttl: None,
        }
    }

    /// TTL for operations tagged without a [`CachePolicy`]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    fn namespaced(&self, key: String) -> String {
        if self.namespace.is_empty() {
            key
        } else {
            format!("{}{CACHE_NAMESPACE_SEPARATOR}{key}", self.namespace)
        }
    }
}

#[async_trait]
impl Interceptor for CacheInterceptor {
    fn pointcut(&self) -> Pointcut {
        Pointcut::of(&CACHE)
    }

    async fn handle(&self, next: Next, invocation: Invocation) -> Result<Value> {
        let policy = next
            .operation()
            .find_tag(self.pointcut())
            .and_then(|tag| tag.options::<CachePolicy>())
            .cloned()
            .unwrap_or_else(|| CachePolicy {
                ttl: self.default_ttl,
                ..CachePolicy::default()
            });

        let key = self.namespaced((policy.key_generator)(
            next.operation().method(),
            &invocation.args,
            &invocation.kwargs,
        ));

        if self.provider.exists(&key).await? {
            // An entry can expire between the check and the read
            if let Some(json) = self.provider.get_json(&key).await? {
                debug!(%key, "Cache hit");
                return serde_json::from_str(&json).map_err(|err| {
                    Error::internal(format!("Corrupt cache entry '{key}': {err}"))
                });
            }
        }

        debug!(%key, "Cache miss");
        let value = next.run(invocation).await?;
        let json = serde_json::to_string(&value)
            .map_err(|err| Error::internal(format!("Cannot cache '{key}': {err}")))?;
        self.provider
            .set_json(&key, &json, CacheEntryConfig { ttl: policy.ttl })
            .await?;
        Ok(value)
    }
}

impl fmt::Debug for CacheInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInterceptor")
            .field("provider", &self.provider.provider_name())
            .field("namespace", &self.namespace)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
