//! Token Introspection Port

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Exchanges bearer credentials with an external authorization server
///
/// Implementations return the decoded JSON payload. A response with a
/// non-success status is normalized to `{"error": <body>}` so callers can
/// treat both shapes uniformly. Transport failures surface as
/// `Error::Network`.
#[async_trait]
pub trait TokenIntrospectionProvider: Send + Sync {
    /// Call the user-info endpoint with the credential as a bearer header
    async fn user_info(&self, token: &str) -> Result<Value>;

    /// Call the token-check endpoint with the credential as a query parameter
    async fn check_token(&self, token: &str) -> Result<Value>;
}
