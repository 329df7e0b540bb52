//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{
    CONFLICT_REASON, LIMIT_REASON, NOT_FOUND_REASON, StoreError, TraceId, UserId,
};
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn traced<F: FnOnce() -> Error>(build: F) -> Error {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    TraceId::scope(trace_id, async move { build() }).await
}

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value = serde_json::from_slice(&bytes).expect("envelope JSON");
    (status, trace_id, value)
}

#[rstest]
#[case(Error::invalid_request("name must not be empty"), StatusCode::BAD_REQUEST)]
#[case(Error::limit_exceeded(LIMIT_REASON), StatusCode::BAD_REQUEST)]
#[case(Error::not_found(NOT_FOUND_REASON), StatusCode::NOT_FOUND)]
#[case(Error::conflict(CONFLICT_REASON), StatusCode::CONFLICT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[case(Shape::Success(SuccessKind::Created), StatusCode::CREATED)]
#[case(Shape::Success(SuccessKind::Listed), StatusCode::OK)]
#[case(Shape::Success(SuccessKind::Deleted), StatusCode::OK)]
#[case(Shape::Failure(ErrorCode::LimitExceeded), StatusCode::BAD_REQUEST)]
fn shapes_map_to_status_codes(#[case] shape: Shape, #[case] status: StatusCode) {
    assert_eq!(status_for(shape), status);
}

#[rstest]
#[actix_web::test]
async fn conflict_renders_failure_envelope_with_trace_header() {
    let error = traced(|| {
        Error::from(StoreError::EmailConflict {
            email: "alice@example.com".to_owned(),
        })
    })
    .await;
    let (status, trace_id, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({"success": false, "message": "Conflict", "error": "email already registered"})
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = traced(|| Error::internal("failed to write /srv/users.json")).await;
    let (status, _, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!(INTERNAL_REASON));
    assert!(body.get("data").is_none());
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let error = Error::not_found(NOT_FOUND_REASON);
    let (_, trace_id, body) = body_of(&error).await;
    assert!(trace_id.is_none());
    assert_eq!(body["success"], json!(false));
}

#[rstest]
fn not_found_store_errors_become_404() {
    let error = Error::from(StoreError::NotFound {
        id: UserId::new(1).expect("valid id"),
    });
    assert_eq!(ResponseError::status_code(&error), StatusCode::NOT_FOUND);
}
