use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::{Value, json};

use account_session::{CoordinationError, Rejection};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)>;
}

/// Map each coordination error to a status code and a structured body
///
/// Bodies carry an explicit `success: false` flag and a stable error code;
/// downstream details never leave the process.
fn status_and_body(e: &CoordinationError) -> (StatusCode, Json<Value>) {
    let (status, code) = match e {
        CoordinationError::MalformedSession(_) => (StatusCode::UNAUTHORIZED, "malformed_session"),
        CoordinationError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        CoordinationError::Rejected(rejection) => {
            let status = match rejection {
                Rejection::DuplicateEmail | Rejection::EmailInUse => StatusCode::CONFLICT,
                Rejection::InvalidCredentials => StatusCode::UNAUTHORIZED,
                Rejection::InvalidCredentialFormat => StatusCode::BAD_REQUEST,
            };
            (status, rejection.code())
        }
        CoordinationError::DownstreamFailure => (StatusCode::BAD_GATEWAY, "downstream_failure"),
        CoordinationError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (status, Json(json!({ "success": false, "error": code })))
}

impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)> {
        self.map_err(|e| status_and_body(&e))
    }
}

pub(crate) fn error_response(e: CoordinationError) -> Response {
    status_and_body(&e).into_response()
}
