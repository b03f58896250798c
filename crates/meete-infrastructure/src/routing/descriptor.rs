//! Route declarations and descriptors

use std::fmt;

use meete_domain::error::Result;

use super::template::PathTemplate;
use crate::constants::DEFAULT_RESPONSE_DESCRIPTION;

/// HTTP verbs a route can answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Every verb, for routes declared with [`Route::any`]
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
        Self::Trace,
    ];

    /// Upper-case verb
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Principal a route requires before dispatch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Access {
    /// No credential needed
    #[default]
    Public,
    /// An active user holding every listed authority
    User {
        /// Required authorities, possibly empty
        authorities: Vec<String>,
    },
    /// An active OAuth2 client
    Client,
}

/// Response metadata passed through to documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Status of successful responses
    pub status: u16,
    /// One-line summary
    pub summary: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Description of the successful response
    pub response_description: String,
    /// Documentation tags
    pub tags: Vec<String>,
    /// Whether the route is deprecated
    pub deprecated: bool,
    /// Whether the route appears in generated documentation
    pub include_in_schema: bool,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            status: 200,
            summary: None,
            description: None,
            response_description: DEFAULT_RESPONSE_DESCRIPTION.to_string(),
            tags: Vec::new(),
            deprecated: false,
            include_in_schema: true,
        }
    }
}

/// Route as declared by a handler group
#[derive(Debug, Clone)]
pub struct Route {
    methods: Vec<HttpMethod>,
    path: String,
    operation: &'static str,
    access: Access,
    response: ResponseMeta,
}

impl Route {
    /// Route answering `methods` at `path` with `operation`
    pub fn new(methods: &[HttpMethod], path: impl Into<String>, operation: &'static str) -> Self {
        Self {
            methods: methods.to_vec(),
            path: path.into(),
            operation,
            access: Access::Public,
            response: ResponseMeta::default(),
        }
    }

    /// GET route
    pub fn get(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Get], path, operation)
    }

    /// POST route
    pub fn post(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Post], path, operation)
    }

    /// PUT route
    pub fn put(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Put], path, operation)
    }

    /// DELETE route
    pub fn delete(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Delete], path, operation)
    }

    /// PATCH route
    pub fn patch(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Patch], path, operation)
    }

    /// HEAD route
    pub fn head(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Head], path, operation)
    }

    /// OPTIONS route
    pub fn options(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Options], path, operation)
    }

    /// TRACE route
    pub fn trace(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&[HttpMethod::Trace], path, operation)
    }

    /// Route answering every verb
    pub fn any(path: impl Into<String>, operation: &'static str) -> Self {
        Self::new(&HttpMethod::ALL, path, operation)
    }

    /// Require an active user
    #[must_use]
    pub fn user(mut self) -> Self {
        if !matches!(self.access, Access::User { .. }) {
            self.access = Access::User {
                authorities: Vec::new(),
            };
        }
        self
    }

    /// Require an active user holding every listed authority
    #[must_use]
    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access = Access::User {
            authorities: authorities.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Require an active OAuth2 client
    #[must_use]
    pub fn client(mut self) -> Self {
        self.access = Access::Client;
        self
    }

    /// Status of successful responses
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.response.status = status;
        self
    }

    /// One-line summary
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.response.summary = Some(summary.into());
        self
    }

    /// Longer description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.response.description = Some(description.into());
        self
    }

    /// Description of the successful response
    #[must_use]
    pub fn response_description(mut self, description: impl Into<String>) -> Self {
        self.response.response_description = description.into();
        self
    }

    /// Add a documentation tag
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.response.tags.push(tag.into());
        self
    }

    /// Mark deprecated
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.response.deprecated = true;
        self
    }

    /// Leave out of generated documentation
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.response.include_in_schema = false;
        self
    }

    /// Validate the path and freeze the declaration
    pub fn describe(self) -> Result<RouteDescriptor> {
        Ok(RouteDescriptor {
            methods: self.methods,
            template: PathTemplate::parse(&self.path)?,
            operation: self.operation,
            access: self.access,
            response: self.response,
        })
    }
}

/// Validated, immutable route
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Verbs answered
    pub methods: Vec<HttpMethod>,
    /// Path relative to the group prefix
    pub template: PathTemplate,
    /// Operation name in the handler's dispatch table
    pub operation: &'static str,
    /// Principal required before dispatch
    pub access: Access,
    /// Response metadata
    pub response: ResponseMeta,
}
