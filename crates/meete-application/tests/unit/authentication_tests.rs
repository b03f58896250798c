//! Tests for the authentication use case

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use meete_application::AuthenticationService;
use meete_domain::error::{Error, Result};
use meete_domain::ports::providers::TokenIntrospectionProvider;
use serde_json::{Value, json};

/// Introspection backend answering every call with a canned result
struct StubIntrospection {
    user: Value,
    client: Value,
    unreachable: bool,
    calls: AtomicUsize,
}

impl StubIntrospection {
    fn user(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            user: payload,
            client: Value::Null,
            unreachable: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn client(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            user: Value::Null,
            client: payload,
            unreachable: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            user: Value::Null,
            client: Value::Null,
            unreachable: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn answer(&self, payload: &Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(Error::network("connection refused"));
        }
        Ok(payload.clone())
    }
}

#[async_trait]
impl TokenIntrospectionProvider for StubIntrospection {
    async fn user_info(&self, _token: &str) -> Result<Value> {
        self.answer(&self.user)
    }

    async fn check_token(&self, _token: &str) -> Result<Value> {
        self.answer(&self.client)
    }
}

fn service(stub: &Arc<StubIntrospection>) -> AuthenticationService {
    AuthenticationService::new(Arc::clone(stub) as Arc<dyn TokenIntrospectionProvider>)
}

#[tokio::test]
async fn test_missing_credential_is_unauthenticated_without_calling_backend() {
    let stub = StubIntrospection::user(json!({"user": "alice"}));
    let err = service(&stub).require_user(None).await.expect_err("no token");
    assert!(matches!(err, Error::Unauthenticated { .. }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_user_resolution_extracts_authorities() {
    let stub = StubIntrospection::user(json!({"user": "alice", "authorities": [{"role": "ADMIN"}]}));
    let user = service(&stub).require_user(Some("tok")).await.expect("user");
    assert_eq!(user.authorities, vec!["ADMIN".to_string()]);
    assert_eq!(user.name().as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_error_payload_surfaces_message() {
    let stub = StubIntrospection::user(json!({"error": "invalid_token"}));
    match service(&stub).require_user(Some("tok")).await {
        Err(Error::Unauthenticated { message, .. }) => assert_eq!(message, "invalid_token"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_disabled_user_rejected_regardless_of_authorities() {
    let stub = StubIntrospection::user(json!({
        "user": "alice",
        "active": false,
        "authorities": ["ADMIN", "LECTURER"]
    }));
    let auth = service(&stub);
    match auth.require_user(Some("tok")).await {
        Err(Error::Unauthenticated { message, .. }) => {
            assert_eq!(message, "This user has been disabled");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        auth.require_authorities(Some("tok"), &["ADMIN"]).await,
        Err(Error::Unauthenticated { .. })
    ));
}

#[tokio::test]
async fn test_network_failure_becomes_unauthenticated() {
    let stub = StubIntrospection::unreachable();
    match service(&stub).require_user(Some("tok")).await {
        Err(Error::Unauthenticated { message, .. }) => {
            assert_eq!(message, "Can't connect to authorization server");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_authority_is_unauthorized() {
    let stub = StubIntrospection::user(json!({"user": "alice", "authorities": ["STUDENT"]}));
    let auth = service(&stub);
    let err = auth
        .require_authorities(Some("tok"), &["STUDENT", "LECTURER"])
        .await
        .expect_err("missing LECTURER");
    assert!(matches!(err, Error::Unauthorized { code: 403, .. }));

    let user = auth
        .require_authorities(Some("tok"), &["STUDENT"])
        .await
        .expect("has STUDENT");
    assert_eq!(user.authorities, vec!["STUDENT".to_string()]);
}

#[tokio::test]
async fn test_client_resolution_and_disabled_client() {
    let stub = StubIntrospection::client(json!({"client_id": "mobile", "active": true, "scope": ["read"]}));
    let client = service(&stub).require_client(Some("tok")).await.expect("client");
    assert_eq!(client.client_id, "mobile");

    let disabled = StubIntrospection::client(json!({"client_id": "mobile", "active": false}));
    match service(&disabled).require_client(Some("tok")).await {
        Err(Error::Unauthenticated { message, .. }) => {
            assert_eq!(message, "This client has been disabled");
        }
        other => panic!("unexpected {other:?}"),
    }
}
