//! HTTP adapter mapping for domain errors.
//!
//! Keeps [`Error`] free of transport concerns while letting handlers return it
//! with `?`. The status code comes from the error code; the body is always the
//! failure [`Envelope`].

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{
    Envelope, Error, ErrorCode, INTERNAL_REASON, Shape, SuccessKind, TRACE_ID_HEADER,
};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Status code for an envelope shape.
pub fn status_for(shape: Shape) -> StatusCode {
    match shape {
        Shape::Success(SuccessKind::Created) => StatusCode::CREATED,
        Shape::Success(_) => StatusCode::OK,
        Shape::Failure(code) => status_for_code(code),
    }
}

fn status_for_code(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::LimitExceeded => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for_code(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(Envelope::<()>::failure(self))
    }
}

impl From<actix_web::error::BlockingError> for Error {
    fn from(err: actix_web::error::BlockingError) -> Self {
        error!(error = %err, "blocking store call was cancelled");
        Error::internal(INTERNAL_REASON)
    }
}

#[cfg(test)]
mod tests;
