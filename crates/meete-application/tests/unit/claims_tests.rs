//! Tests for principal extraction rules

use meete_application::domain_services::claims::*;
use meete_domain::error::Error;
use serde_json::json;

#[test]
fn test_authorities_from_role_objects() {
    let payload = json!({"authorities": [{"role": "ADMIN"}]});
    assert_eq!(extract_authorities(&payload), vec!["ADMIN".to_string()]);
}

#[test]
fn test_authority_key_priority() {
    let payload = json!({"authorities": [{"value": "V", "authority": "A", "role": "R"}, "PLAIN"]});
    assert_eq!(
        extract_authorities(&payload),
        vec!["A".to_string(), "PLAIN".to_string()]
    );
}

#[test]
fn test_nested_search_tries_every_sibling() {
    // "a_meta" comes first and has no authorities; the search keeps going
    // to "b_principal".
    let payload = json!({
        "a_meta": {"issued": 1},
        "b_principal": {"detail": {"authorities": ["LECTURER"]}}
    });
    assert_eq!(extract_authorities(&payload), vec!["LECTURER".to_string()]);
}

#[test]
fn test_first_sibling_in_document_order_wins() {
    let payload: serde_json::Value = serde_json::from_str(
        r#"{"zeta": {"authorities": ["FIRST"]}, "alpha": {"authorities": ["SECOND"]}}"#,
    )
    .expect("payload");
    assert_eq!(extract_authorities(&payload), vec!["FIRST".to_string()]);
}

#[test]
fn test_empty_list_does_not_stop_search() {
    let payload = json!({
        "authorities": [],
        "userAuthentication": {"authorities": [{"authority": "STUDENT"}]}
    });
    assert_eq!(extract_authorities(&payload), vec!["STUDENT".to_string()]);
}

#[test]
fn test_missing_authorities_yield_empty_list() {
    assert!(extract_authorities(&json!({"user": "alice"})).is_empty());
    assert!(extract_authorities(&json!("not an object")).is_empty());
}

#[test]
fn test_user_principal_key_order_and_defaults() {
    let user = extract_user(&json!({"id": 7, "username": "alice"}));
    assert_eq!(user.principal, json!("alice"));
    assert!(user.active);
    assert_eq!(user.details, json!({"id": 7, "username": "alice"}));

    let disabled = extract_user(&json!({"name": "bob", "active": false, "details": {"x": 1}}));
    assert!(!disabled.active);
    assert_eq!(disabled.details, json!({"x": 1}));
}

#[test]
fn test_client_extraction() {
    let client = extract_client(&json!({
        "client_id": "mobile",
        "active": true,
        "scope": ["read", "write"],
        "additional_information": {"partner_id": 12}
    }))
    .expect("client");
    assert_eq!(client.client_id, "mobile");
    assert_eq!(client.scope, vec!["read", "write"]);
    assert_eq!(client.partner_id, Some(12));

    let spaced = extract_client(&json!({"client_id": "web", "active": true, "scope": "a b"}))
        .expect("client");
    assert_eq!(spaced.scope, vec!["a", "b"]);
    assert!(spaced.additional_information.is_empty());
    assert_eq!(spaced.partner_id, None);
}

#[test]
fn test_client_without_id_is_unauthenticated() {
    let err = extract_client(&json!({"active": true})).expect_err("missing id");
    assert!(matches!(err, Error::Unauthenticated { .. }));
}

#[test]
fn test_check_error_shapes() {
    assert!(check_error(&json!({"user": "alice"})).is_ok());

    match check_error(&json!({"error": "invalid_token"})) {
        Err(Error::Unauthenticated { message, code }) => {
            assert_eq!(message, "invalid_token");
            assert_eq!(code, 401);
        }
        other => panic!("unexpected {other:?}"),
    }

    match check_error(&json!({"error": {"message": "expired", "code": 4011}})) {
        Err(Error::Unauthenticated { message, code }) => {
            assert_eq!(message, "expired");
            assert_eq!(code, 4011);
        }
        other => panic!("unexpected {other:?}"),
    }

    match check_error(&json!({"error": {"error": "invalid_grant", "error_description": "x"}})) {
        Err(Error::Unauthenticated { message, .. }) => assert_eq!(message, "invalid_grant"),
        other => panic!("unexpected {other:?}"),
    }

    match check_error(&json!({"error": 500})) {
        Err(Error::Unauthenticated { message, .. }) => assert_eq!(message, "Unauthenticated"),
        other => panic!("unexpected {other:?}"),
    }
}
