//! Structural validation for inbound HTTP requests.
//!
//! Malformed JSON, wrong field types, unknown fields and bad path ids are all
//! rejected here with [`Error::invalid_request`] before the store is called.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::{Error, NOT_FOUND_REASON, UserId, UserValidationError};

/// Parse a path segment into a [`UserId`].
///
/// Non-numeric and out-of-range values are validation failures, never
/// "not found".
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::parse(raw).map_err(validation_error)
}

/// Map a field validation failure onto an HTTP-facing error.
pub(crate) fn validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn json_error_message(err: &JsonPayloadError) -> String {
    match err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid request body: {inner}"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "request body is too large".to_owned()
        }
        _ => "invalid request body".to_owned(),
    }
}

/// JSON extractor configuration turning body errors into failure envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            Error::invalid_request(json_error_message(&err)).into()
        })
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> Result<HttpResponse, Error> {
    Err(Error::not_found(NOT_FOUND_REASON))
}
