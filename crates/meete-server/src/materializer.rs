//! Router materialization
//!
//! Turns the route descriptors of a handler group into Rocket routes. Each
//! route gets an [`Endpoint`] that authenticates the caller, maps the
//! request onto an [`Invocation`] and calls the operation through the
//! group's woven dispatch table.
//!
//! | Request part | Invocation |
//! |--------------|------------|
//! | path parameters | positional arguments in template order, and keyword arguments by name |
//! | query parameters | keyword arguments |
//! | JSON body | keyword argument `body` |
//! | resolved principal | keyword argument `principal` |

use std::sync::Arc;

use meete_application::AuthenticationService;
use meete_domain::error::{Error, Result};
use meete_domain::value_objects::Principal;
use meete_infrastructure::constants::{AUTHORIZATION_HEADER, BEARER_SCHEME};
use meete_infrastructure::di::dispatch::PRINCIPAL_KWARG;
use meete_infrastructure::di::{CapabilityKey, Container, DispatchTable, Invocation};
use meete_infrastructure::routing::{Access, GroupDescriptor, HttpMethod, RouteDescriptor};
use rocket::data::{ByteUnit, Data};
use rocket::http::{Method, Status};
use rocket::request::Request;
use rocket::route::{self, Handler, Route};
use rocket::serde::json::Json;
use serde_json::Value;
use tracing::info;

use crate::constants::BODY_KWARG;
use crate::error::ApiError;

/// Path parameter bound by a route: name, segment index after the mount
/// point, whether it takes the rest of the path
#[derive(Debug, Clone)]
struct PathParam {
    name: String,
    index: usize,
    tail: bool,
}

/// Rocket handler forwarding requests to one operation
#[derive(Clone)]
pub struct Endpoint {
    container: Arc<Container>,
    dispatch: CapabilityKey,
    operation: &'static str,
    access: Access,
    params: Vec<PathParam>,
    status: Status,
    body_limit: ByteUnit,
}

impl Endpoint {
    fn new(
        container: &Arc<Container>,
        dispatch: CapabilityKey,
        route: &RouteDescriptor,
        body_limit: ByteUnit,
    ) -> Self {
        Self {
            container: Arc::clone(container),
            dispatch,
            operation: route.operation,
            access: route.access.clone(),
            params: route
                .template
                .params()
                .into_iter()
                .map(|(name, index, tail)| PathParam {
                    name: name.to_string(),
                    index,
                    tail,
                })
                .collect(),
            status: Status::from_code(route.response.status).unwrap_or(Status::Ok),
            body_limit,
        }
    }

    async fn respond(&self, request: &Request<'_>, data: Data<'_>) -> Result<Value> {
        let principal = self.authenticate(request).await?;

        let mut invocation = self.path_arguments(request)?;
        self.query_arguments(request, &mut invocation);
        if let Some(body) = self.body(data).await? {
            invocation = invocation.with_kwarg(BODY_KWARG, body);
        }
        if let Some(principal) = &principal {
            invocation = invocation.with_principal(principal)?;
        }

        // Re-resolved per call: the container memoizes the woven table
        let table = self.container.resolve_key::<DispatchTable>(self.dispatch)?;
        table.invoke(self.operation, invocation).await
    }

    async fn authenticate(&self, request: &Request<'_>) -> Result<Option<Principal>> {
        if self.access == Access::Public {
            return Ok(None);
        }

        let auth = self.container.resolve::<AuthenticationService>()?;
        let token = bearer_token(request);
        let principal = match &self.access {
            Access::Public => return Ok(None),
            Access::User { authorities } => {
                Principal::User(auth.require_authorities(token, authorities.as_slice()).await?)
            }
            Access::Client => Principal::Client(auth.require_client(token).await?),
        };
        Ok(Some(principal))
    }

    fn path_arguments(&self, request: &Request<'_>) -> Result<Invocation> {
        let mut invocation = Invocation::new();
        for param in &self.params {
            let value = if param.tail {
                request
                    .routed_segments(param.index..)
                    .collect::<Vec<_>>()
                    .join("/")
            } else {
                request
                    .param::<&str>(param.index)
                    .and_then(|value| value.ok())
                    .map(ToString::to_string)
                    .ok_or_else(|| {
                        Error::invalid_argument(format!("Missing path parameter '{}'", param.name))
                    })?
            };
            invocation = invocation
                .with_arg(value.clone())
                .with_kwarg(param.name.clone(), value);
        }
        Ok(invocation)
    }

    fn query_arguments(&self, request: &Request<'_>, invocation: &mut Invocation) {
        let Some(query) = request.uri().query() else {
            return;
        };
        for (name, value) in query.segments() {
            let reserved = name == PRINCIPAL_KWARG
                || name == BODY_KWARG
                || self.params.iter().any(|param| param.name == name);
            if !reserved {
                invocation
                    .kwargs
                    .insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    async fn body(&self, data: Data<'_>) -> Result<Option<Value>> {
        let capped = data.open(self.body_limit).into_string().await?;
        if !capped.is_complete() {
            return Err(Error::invalid_argument(format!(
                "Request body exceeds {}",
                self.body_limit
            )));
        }
        let text = capped.into_inner();
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

#[rocket::async_trait]
impl Handler for Endpoint {
    async fn handle<'r>(&self, request: &'r Request<'_>, data: Data<'r>) -> route::Outcome<'r> {
        match self.respond(request, data).await {
            Ok(value) => route::Outcome::from(request, (self.status, Json(value))),
            Err(err) => route::Outcome::from(request, ApiError(err)),
        }
    }
}

/// Credential of an `Authorization: Bearer <token>` header
fn bearer_token<'a>(request: &'a Request<'_>) -> Option<&'a str> {
    let header = request.headers().get_one(AUTHORIZATION_HEADER)?;
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

fn rocket_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
        HttpMethod::Delete => Method::Delete,
        HttpMethod::Patch => Method::Patch,
        HttpMethod::Head => Method::Head,
        HttpMethod::Options => Method::Options,
        HttpMethod::Trace => Method::Trace,
    }
}

/// Build the Rocket routes of `group`, in declaration order
///
/// The group's dispatch table is resolved up front, so a handler that
/// cannot be wired or a route naming an unknown operation fails here
/// rather than on the first request.
pub fn materialize(
    container: &Arc<Container>,
    group: &GroupDescriptor,
    body_limit: ByteUnit,
) -> Result<Vec<Route>> {
    let table = container.resolve_key::<DispatchTable>(group.dispatch)?;

    let mut routes = Vec::new();
    for descriptor in &group.routes {
        if table.operation(descriptor.operation).is_none() {
            return Err(Error::not_found(format!(
                "Operation '{}' of handler group '{}'",
                descriptor.operation, group.name
            )));
        }

        let endpoint = Endpoint::new(container, group.dispatch, descriptor, body_limit);
        let uri = descriptor.template.angle_path();
        for method in &descriptor.methods {
            let mut route = Route::new(rocket_method(*method), &uri, endpoint.clone());
            route.name = Some(format!("{}.{}", group.name, descriptor.operation).into());
            info!(
                group = group.name,
                method = %method,
                path = %mounted_path(&group.prefix, &uri),
                operation = descriptor.operation,
                "Mounted"
            );
            routes.push(route);
        }
    }
    Ok(routes)
}

fn mounted_path(prefix: &str, uri: &str) -> String {
    match (prefix.trim_end_matches('/'), uri) {
        ("", uri) => uri.to_string(),
        (prefix, "/") => prefix.to_string(),
        (prefix, uri) => format!("{prefix}{uri}"),
    }
}
