//! Domain errors as HTTP responses.
//!
//! Every failure leaves as the JSON form of [`Error`], with its trace id
//! echoed in a header. Server-side failures are logged in full; internal
//! ones reach the client with a generic message and no details.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Copy of `error` safe to send to a client.
fn public_form(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let generic = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id),
        None => generic,
    }
}

impl ResponseError for Error {
    /// Conflicts share 400 with validation failures; the body's `code`
    /// tells them apart.
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                trace_id = self.trace_id().unwrap_or("-"),
                message = self.message(),
                "request failed"
            );
        }
        let mut response = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_form(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in a handler");
        Self::internal(INTERNAL_MESSAGE)
    }
}
