//! Error responses
//!
//! Every failure leaves the server as `{code, message, errors}`, whether it
//! was raised by an operation, by authentication or by Rocket itself.

use meete_domain::error::Error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Catcher, catch, catchers};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

/// Structured error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine code, the HTTP status unless the error carries its own
    pub code: i64,
    /// Human readable reason
    pub message: String,
    /// Field-level details
    pub errors: Vec<Value>,
}

impl ErrorBody {
    /// Body describing a domain error
    pub fn from_error(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.public_message(),
            errors: Vec::new(),
        }
    }

    /// Body describing a bare status
    pub fn from_status(status: Status) -> Self {
        Self {
            code: i64::from(status.code),
            message: status.reason_lossy().to_string(),
            errors: Vec::new(),
        }
    }
}

/// Domain error answered as a structured JSON response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// HTTP status of the response
    pub fn status(&self) -> Status {
        Status::from_code(self.0.status_code()).unwrap_or(Status::InternalServerError)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.class().is_server_error() {
            error!(uri = %request.uri(), error = %self.0, "Request failed");
        } else {
            debug!(uri = %request.uri(), status = status.code, error = %self.0, "Request rejected");
        }
        (status, Json(ErrorBody::from_error(&self.0))).respond_to(request)
    }
}

#[catch(404)]
fn not_found(_request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (Status::NotFound, Json(ErrorBody::from_status(Status::NotFound)))
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (status, Json(ErrorBody::from_status(status)))
}

/// Catchers answering Rocket-level failures with [`ErrorBody`]
pub fn catchers() -> Vec<Catcher> {
    catchers![not_found, default_catcher]
}
