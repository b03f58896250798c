//! Principal extraction from token introspection payloads
//!
//! Authorization servers disagree on response shapes. The rules here read
//! a user or client out of any JSON object using ordered candidate keys:
//!
//! - principal: first present of `user, username, userid, user_id, login, id, name`
//! - authorities: the first non-empty `authorities` array found by a
//!   depth-first search over nested objects, bounded by
//!   [`AUTHORITY_SEARCH_DEPTH`]; every sibling is tried before giving up
//! - authority entries: strings as-is, objects by their first present
//!   `authority, role, value` key

use meete_domain::constants::{
    ADDITIONAL_INFORMATION_FIELD, AUTHORITIES_FIELD, AUTHORITY_KEYS, AUTHORITY_SEARCH_DEPTH,
    DETAILS_FIELD, PARTNER_ID_FIELD, PRINCIPAL_KEYS,
};
use meete_domain::error::{Error, Result};
use meete_domain::value_objects::{Client, User};
use serde_json::{Map, Value};

/// Fail with `Unauthenticated` when the payload carries an `error` field
///
/// | `error` value | resulting message |
/// |---------------|-------------------|
/// | `{"message": m, "code": c}` | `m`, with `c` as body code |
/// | `{"error": e}` | `e` |
/// | string `s` | `s` |
/// | anything else | default message |
pub fn check_error(payload: &Value) -> Result<()> {
    let Some(error) = payload.get("error") else {
        return Ok(());
    };

    match error {
        Value::Object(fields) if fields.contains_key("message") && fields.contains_key("code") => {
            let message = text(&fields["message"]);
            match fields["code"].as_i64() {
                Some(code) => Err(Error::unauthenticated_with_code(code, message)),
                None => Err(Error::unauthenticated(message)),
            }
        }
        Value::Object(fields) if fields.contains_key("error") => {
            Err(Error::unauthenticated(text(&fields["error"])))
        }
        Value::String(message) => Err(Error::unauthenticated(message.clone())),
        _ => Err(Error::unauthenticated_default()),
    }
}

/// Build a user from a successful user-info payload
pub fn extract_user(payload: &Value) -> User {
    let principal = PRINCIPAL_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .cloned()
        .unwrap_or(Value::Null);

    User {
        principal,
        authorities: extract_authorities(payload),
        active: payload
            .get("active")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        details: payload
            .get(DETAILS_FIELD)
            .cloned()
            .unwrap_or_else(|| payload.clone()),
    }
}

/// Build a client from a successful token-check payload
pub fn extract_client(payload: &Value) -> Result<Client> {
    let client_id = match payload.get("client_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(Error::unauthenticated(
                "Token check response carries no client_id",
            ));
        }
    };
    let Some(active) = payload.get("active").and_then(Value::as_bool) else {
        return Err(Error::unauthenticated(
            "Token check response carries no active flag",
        ));
    };

    let scope = match payload.get("scope") {
        Some(Value::Array(scopes)) => scopes.iter().map(text).collect(),
        Some(Value::String(scopes)) => scopes.split_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    };
    let additional_information = payload
        .get(ADDITIONAL_INFORMATION_FIELD)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    let partner_id = additional_information
        .get(PARTNER_ID_FIELD)
        .and_then(Value::as_i64);

    Ok(Client {
        client_id,
        active,
        scope,
        additional_information,
        partner_id,
    })
}

/// Authorities found anywhere in the payload, empty when none
pub fn extract_authorities(payload: &Value) -> Vec<String> {
    find_authorities(payload, AUTHORITY_SEARCH_DEPTH).unwrap_or_default()
}

fn find_authorities(value: &Value, depth: usize) -> Option<Vec<String>> {
    if depth == 0 {
        return None;
    }
    let Value::Object(fields) = value else {
        return None;
    };

    if let Some(Value::Array(entries)) = fields.get(AUTHORITIES_FIELD) {
        let found: Vec<String> = entries.iter().filter_map(authority_name).collect();
        if !found.is_empty() {
            return Some(found);
        }
    }

    fields
        .iter()
        .filter(|(key, _)| key.as_str() != AUTHORITIES_FIELD)
        .find_map(|(_, nested)| find_authorities(nested, depth - 1))
}

fn authority_name(entry: &Value) -> Option<String> {
    match entry {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => AUTHORITY_KEYS
            .iter()
            .find_map(|key| fields.get(*key))
            .filter(|value| !value.is_null())
            .map(text),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
