//! HTTP token introspection
//!
//! Talks to the authorization server's user-info and token-check
//! endpoints. Endpoint URLs go through the [`ServiceResolver`] on every
//! call so a moved authorization server is picked up once the cached
//! address expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::TokenIntrospectionProvider;
use reqwest::{Response, StatusCode, Url};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::AuthConfig;
use crate::constants::TOKEN_QUERY_PARAM;
use crate::discovery::ServiceResolver;
use crate::error_ext::ErrorContext;

/// Introspection backend speaking HTTP
#[derive(Debug, Clone)]
pub struct HttpTokenIntrospection {
    client: reqwest::Client,
    resolver: Arc<ServiceResolver>,
    user_info_url: String,
    client_info_url: String,
}

impl HttpTokenIntrospection {
    /// Create the backend from configuration
    pub fn new(config: &AuthConfig, resolver: Arc<ServiceResolver>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .network_context("Failed to build introspection HTTP client")?;

        Ok(Self {
            client,
            resolver,
            user_info_url: config.user_info_url.clone(),
            client_info_url: config.client_info_url.clone(),
        })
    }

    /// Decode a response, folding non-200 answers into `{"error": body}`
    async fn decode(response: Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .network_context("Failed to read introspection response")?;

        if status != StatusCode::OK {
            debug!(%status, "Introspection endpoint rejected the credential");
            let payload = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            return Ok(json!({ "error": payload }));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TokenIntrospectionProvider for HttpTokenIntrospection {
    async fn user_info(&self, token: &str) -> Result<Value> {
        let url = self.resolver.resolve_url(&self.user_info_url).await?;
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .network_context(format!("User-info request to {url} failed"))?;
        Self::decode(response).await
    }

    async fn check_token(&self, token: &str) -> Result<Value> {
        let resolved = self.resolver.resolve_url(&self.client_info_url).await?;
        let mut url = Url::parse(&resolved)
            .map_err(|e| Error::configuration(format!("Invalid token-check URL '{resolved}': {e}")))?;
        url.query_pairs_mut().append_pair(TOKEN_QUERY_PARAM, token);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .network_context(format!("Token-check request to {resolved} failed"))?;
        Self::decode(response).await
    }
}
