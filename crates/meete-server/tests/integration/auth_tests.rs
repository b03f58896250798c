//! Access requirements of the shipped handler groups
//!
//! Introspection is answered by a stub provider registered over the HTTP
//! one; everything else is the production wiring.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use meete_domain::error::Result;
use meete_domain::ports::providers::TokenIntrospectionProvider;
use meete_domain::repositories::CourseRepository;
use meete_domain::value_objects::Course;
use meete_infrastructure::AppConfig;
use meete_infrastructure::di::{Registry, register_infrastructure};
use meete_infrastructure::routing::{GroupCollector, ModuleTree};
use meete_providers::repository::InMemoryCourseRepository;
use meete_server::assemble;
use rocket::http::{Header, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::{Value, json};

struct StubIntrospection;

#[async_trait]
impl TokenIntrospectionProvider for StubIntrospection {
    async fn user_info(&self, token: &str) -> Result<Value> {
        Ok(match token {
            "ada" => json!({
                "user": "ada",
                "active": true,
                "details": {"authorities": [{"authority": "STUDENT"}]}
            }),
            "grace" => json!({"username": "grace", "authorities": ["LECTURER"]}),
            "linus" => json!({"user": "linus", "authorities": [{"role": "LECTURER"}]}),
            "bob" => json!({"user": "bob", "active": false, "authorities": ["LECTURER"]}),
            _ => json!({"error": "invalid_token"}),
        })
    }

    async fn check_token(&self, token: &str) -> Result<Value> {
        Ok(match token {
            "portal" => json!({
                "client_id": "portal",
                "active": true,
                "scope": ["read"],
                "additional_information": {"partner_id": 7}
            }),
            _ => json!({"error": {"error": "invalid_token", "error_description": "Unknown"}}),
        })
    }
}

/// Repository counting lookups by identifier
#[derive(Default)]
struct CountingCourses {
    inner: InMemoryCourseRepository,
    lookups: AtomicUsize,
}

#[async_trait]
impl CourseRepository for CountingCourses {
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn list_for_member(&self, member: &str) -> Result<Vec<Course>> {
        self.inner.list_for_member(member).await
    }

    async fn save(&self, course: Course) -> Result<()> {
        self.inner.save(course).await
    }
}

fn algebra() -> Course {
    Course {
        id: 1,
        name: "Algebra".to_string(),
        code: "ALG-1".to_string(),
        lecturer: "grace".to_string(),
        members: vec!["ada".to_string()],
    }
}

async fn client() -> (Client, Arc<CountingCourses>) {
    let courses = Arc::new(CountingCourses::default());
    courses.save(algebra()).await.expect("seed");

    let config = AppConfig::default();
    let registry = Arc::new(Registry::new());
    register_infrastructure(&registry, &config);
    registry.instance::<dyn TokenIntrospectionProvider>(Arc::new(StubIntrospection));
    registry.instance::<dyn CourseRepository>(Arc::clone(&courses) as Arc<dyn CourseRepository>);

    let groups = GroupCollector::new(config.routing.ignored_namespaces.iter().cloned())
        .collect(&ModuleTree::from_registry(), &config.routing.package)
        .expect("groups");
    let rocket = assemble(&config, registry, &groups).expect("assemble");
    (Client::tracked(rocket).await.expect("client"), courses)
}

async fn get_as<'c>(client: &'c Client, uri: &'static str, token: &str) -> LocalResponse<'c> {
    client
        .get(uri)
        .header(Header::new("Authorization", format!("Bearer {token}")))
        .dispatch()
        .await
}

#[tokio::test]
async fn test_missing_credential_is_unauthenticated() {
    let (client, _) = client().await;

    let response = client.get("/users/me").dispatch().await;

    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(
        response.into_json::<Value>().await,
        Some(json!({"code": 401, "message": "Unauthenticated", "errors": []}))
    );
}

#[tokio::test]
async fn test_non_bearer_scheme_is_ignored() {
    let (client, _) = client().await;

    let response = client
        .get("/users/me")
        .header(Header::new("Authorization", "Basic YWRhOnNlY3JldA=="))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_user_principal_reaches_the_operation() {
    let (client, _) = client().await;

    let response = get_as(&client, "/users/me/authorities", "ada").await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_json::<Value>().await, Some(json!(["STUDENT"])));
}

#[tokio::test]
async fn test_introspection_error_message_is_surfaced() {
    let (client, _) = client().await;

    let response = get_as(&client, "/users/me", "stale").await;

    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.expect("body");
    assert_eq!(body["message"], "invalid_token");
}

#[tokio::test]
async fn test_disabled_user_is_rejected() {
    let (client, _) = client().await;

    let response = get_as(&client, "/courses/1/roster", "bob").await;

    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.expect("body");
    assert_eq!(body["message"], "This user has been disabled");
}

#[tokio::test]
async fn test_missing_authority_is_forbidden() {
    let (client, _) = client().await;

    let response = get_as(&client, "/courses/1/roster", "ada").await;

    assert_eq!(response.status(), Status::Forbidden);
    assert_eq!(
        response.into_json::<Value>().await,
        Some(json!({"code": 403, "message": "Unauthorized", "errors": []}))
    );
}

#[tokio::test]
async fn test_roster_is_limited_to_the_course_lecturer() {
    let (client, _) = client().await;

    let response = get_as(&client, "/courses/1/roster", "grace").await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.into_json::<Value>().await,
        Some(json!({"course_id": 1, "code": "ALG-1", "members": ["ada"]}))
    );

    let response = get_as(&client, "/courses/1/roster", "linus").await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[tokio::test]
async fn test_member_lists_own_courses() {
    let (client, _) = client().await;

    let response = get_as(&client, "/courses", "ada").await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.into_json::<Value>().await,
        Some(json!([{"id": 1, "name": "Algebra", "lecturer": "grace"}]))
    );
}

#[tokio::test]
async fn test_client_principal() {
    let (client, _) = client().await;

    let response = get_as(&client, "/clients/me", "portal").await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().await.expect("body");
    assert_eq!(body["client_id"], "portal");
    assert_eq!(body["partner_id"], 7);

    let response = get_as(&client, "/clients/me", "ada").await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.expect("body");
    assert_eq!(body["message"], "invalid_token");
}

#[tokio::test]
async fn test_public_course_lookup_is_cached() {
    let (client, courses) = client().await;

    for _ in 0..2 {
        let response = client.get("/courses/1").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.into_json::<Value>().await,
            Some(json!({"id": 1, "name": "Algebra", "lecturer": "grace"}))
        );
    }
    assert_eq!(courses.lookups.load(Ordering::SeqCst), 1);

    let response = client.get("/courses/99").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(courses.lookups.load(Ordering::SeqCst), 2);
}
