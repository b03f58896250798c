//! Authentication use case
//!
//! Request-time state machine:
//!
//! ```text
//! NoCredential ──────────────────────────────► Unauthenticated
//! CredentialPresent ─► introspection call ─┬─► Resolved(principal) ─► active? ─► principal
//!                                          ├─► transport failure ──► Unauthenticated
//!                                          └─► error payload ──────► Unauthenticated(message)
//! ```

use std::sync::Arc;

use meete_domain::constants::{
    CANNOT_CONNECT_MESSAGE, CLIENT_DISABLED_MESSAGE, USER_DISABLED_MESSAGE,
};
use meete_domain::error::{Error, Result, UNAUTHORIZED_MESSAGE};
use meete_domain::ports::providers::TokenIntrospectionProvider;
use meete_domain::value_objects::{Client, User};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain_services::claims::{check_error, extract_client, extract_user};

/// Resolves bearer credentials into principals
pub struct AuthenticationService {
    introspection: Arc<dyn TokenIntrospectionProvider>,
}

impl AuthenticationService {
    /// Create the service over an introspection backend
    pub fn new(introspection: Arc<dyn TokenIntrospectionProvider>) -> Self {
        Self { introspection }
    }

    /// Exchange a credential for a user, active or not
    pub async fn load_user(&self, token: &str) -> Result<User> {
        let payload = surface(self.introspection.user_info(token).await)?;
        check_error(&payload)?;
        let user = extract_user(&payload);
        debug!(principal = ?user.name(), "User resolved");
        Ok(user)
    }

    /// Exchange a credential for a client, active or not
    pub async fn load_client(&self, token: &str) -> Result<Client> {
        let payload = surface(self.introspection.check_token(token).await)?;
        check_error(&payload)?;
        let client = extract_client(&payload)?;
        debug!(client_id = %client.client_id, "Client resolved");
        Ok(client)
    }

    /// Resolve an active user or fail with `Unauthenticated`
    pub async fn require_user(&self, token: Option<&str>) -> Result<User> {
        let Some(token) = token else {
            return Err(Error::unauthenticated_default());
        };
        let user = self.load_user(token).await?;
        if !user.active {
            return Err(Error::unauthenticated(USER_DISABLED_MESSAGE));
        }
        Ok(user)
    }

    /// Resolve an active client or fail with `Unauthenticated`
    pub async fn require_client(&self, token: Option<&str>) -> Result<Client> {
        let Some(token) = token else {
            return Err(Error::unauthenticated_default());
        };
        let client = self.load_client(token).await?;
        if !client.active {
            return Err(Error::unauthenticated(CLIENT_DISABLED_MESSAGE));
        }
        Ok(client)
    }

    /// Resolve an active user holding every required authority
    pub async fn require_authorities<S: AsRef<str>>(
        &self,
        token: Option<&str>,
        required: &[S],
    ) -> Result<User> {
        let user = self.require_user(token).await?;
        Self::check_authorities(&user, required)?;
        Ok(user)
    }

    /// Fail with `Unauthorized` on the first required authority the user lacks
    pub fn check_authorities<S: AsRef<str>>(user: &User, required: &[S]) -> Result<()> {
        match required
            .iter()
            .find(|authority| !user.has_authority(authority.as_ref()))
        {
            Some(missing) => {
                debug!(missing = missing.as_ref(), "Authority check failed");
                Err(Error::unauthorized(UNAUTHORIZED_MESSAGE))
            }
            None => Ok(()),
        }
    }
}

/// Map any failure of the introspection exchange to `Unauthenticated`
fn surface(result: Result<Value>) -> Result<Value> {
    match result {
        Ok(payload) => Ok(payload),
        Err(Error::Network { message, .. }) => {
            warn!(error = %message, "Authorization server unreachable");
            Err(Error::unauthenticated(CANNOT_CONNECT_MESSAGE))
        }
        Err(err @ Error::Unauthenticated { .. }) => Err(err),
        Err(other) => {
            warn!(error = %other, "Token introspection failed");
            Err(Error::unauthenticated_default())
        }
    }
}
