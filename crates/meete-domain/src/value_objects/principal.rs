//! Authenticated principals
//!
//! A principal is resolved per request from a bearer credential and is
//! never persisted. Users come from the user-info endpoint, clients from
//! the token-check endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An end user resolved from a bearer credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identifier taken from the first present principal key, `null` if none
    pub principal: Value,
    /// Granted authorities, possibly empty
    pub authorities: Vec<String>,
    /// Disabled accounts are rejected by `require_user`
    pub active: bool,
    /// Free-form details reported by the authorization server
    pub details: Value,
}

impl User {
    /// Principal identifier rendered as a plain string
    pub fn name(&self) -> Option<String> {
        match &self.principal {
            Value::Null => None,
            Value::String(name) => Some(name.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Whether the user holds the given authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|held| held == authority)
    }
}

/// An OAuth2 client resolved from a bearer credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier
    pub client_id: String,
    /// Disabled clients are rejected by `require_client`
    pub active: bool,
    /// Granted scopes
    pub scope: Vec<String>,
    /// Free-form metadata reported by the authorization server
    pub additional_information: Map<String, Value>,
    /// Partner the client acts for, if any
    pub partner_id: Option<i64>,
}

/// Either kind of authenticated identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// End user
    User(User),
    /// OAuth2 client
    Client(Client),
}

impl Principal {
    /// The user, when this principal is one
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Client(_) => None,
        }
    }

    /// The client, when this principal is one
    pub fn as_client(&self) -> Option<&Client> {
        match self {
            Self::Client(client) => Some(client),
            Self::User(_) => None,
        }
    }

    /// Whether the principal has not been disabled
    pub fn is_active(&self) -> bool {
        match self {
            Self::User(user) => user.active,
            Self::Client(client) => client.active,
        }
    }
}
