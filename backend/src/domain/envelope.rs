//! Uniform response envelope for every endpoint.
//!
//! Success: `{"success": true, "message": ..., "data": ...}`.
//! Failure: `{"success": false, "message": ..., "error": ...}`.
//!
//! `data` appears only on success and `error` only on failure. The envelope
//! knows nothing about transport status codes; [`Shape`] names the outcome and
//! inbound adapters pick the status from it.

use serde::{Deserialize, Serialize};

use crate::domain::{Error, ErrorCode};

/// Successful operation kinds, each with its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKind {
    Listed,
    Retrieved,
    Created,
    Updated,
    Deleted,
    Healthy,
}

impl SuccessKind {
    /// Human-readable message for the envelope.
    pub fn message(self) -> &'static str {
        match self {
            Self::Listed => "Users retrieved successfully",
            Self::Retrieved => "User retrieved successfully",
            Self::Created => "User created successfully",
            Self::Updated => "User updated successfully",
            Self::Deleted => "User deleted successfully",
            Self::Healthy => "Service is healthy",
        }
    }
}

/// Outcome shape rendered by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Success(SuccessKind),
    Failure(ErrorCode),
}

/// Response envelope wrapping a payload of type `T`.
///
/// # Examples
/// ```
/// use user_registry::domain::{Envelope, Error, SuccessKind};
///
/// let ok = Envelope::success(SuccessKind::Created, 7);
/// assert!(ok.is_success());
/// assert_eq!(ok.data(), Some(&7));
///
/// let failed = Envelope::<()>::failure(&Error::not_found("resource not found"));
/// assert_eq!(failed.error(), Some("resource not found"));
/// assert!(failed.data().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> Envelope<T> {
    /// Wrap a successful payload.
    pub fn success(kind: SuccessKind, data: T) -> Self {
        Self {
            success: true,
            message: kind.message().to_owned(),
            data: Some(data),
            error: None,
        }
    }

    /// Describe a failure. Internal errors are redacted first.
    pub fn failure(error: &Error) -> Self {
        let visible = error.redacted();
        Self {
            success: false,
            message: visible.code().summary().to_owned(),
            data: None,
            error: Some(visible.message().to_owned()),
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable summary.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Payload, present only on success.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Failure reason, present only on failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Render a store result into its shape and envelope.
///
/// `kind` names the success case; failures are shaped by their error code.
pub fn shape<T, E>(kind: SuccessKind, result: Result<T, E>) -> (Shape, Envelope<T>)
where
    E: Into<Error>,
{
    match result {
        Ok(data) => (Shape::Success(kind), Envelope::success(kind, data)),
        Err(err) => {
            let error: Error = err.into();
            (Shape::Failure(error.code()), Envelope::failure(&error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user_store::StoreError;
    use crate::domain::{CONFLICT_REASON, INTERNAL_REASON, LIMIT_REASON, MAX_USERS, UserId};
    use crate::domain::ports::SnapshotRepositoryError;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn success_envelope_serialises_without_error_field() {
        let envelope = Envelope::success(SuccessKind::Retrieved, json!({"id": 1}));
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "User retrieved successfully",
                "data": {"id": 1}
            })
        );
    }

    #[rstest]
    fn failure_envelope_serialises_without_data_field() {
        let envelope = Envelope::<Value>::failure(&Error::conflict(CONFLICT_REASON));
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "Conflict",
                "error": "email already registered"
            })
        );
    }

    #[rstest]
    fn failure_envelope_redacts_internal_detail() {
        let envelope = Envelope::<()>::failure(&Error::internal("snapshot at /srv/x.json failed"));
        assert_eq!(envelope.error(), Some(INTERNAL_REASON));
    }

    #[rstest]
    #[case(SuccessKind::Listed)]
    #[case(SuccessKind::Created)]
    #[case(SuccessKind::Deleted)]
    fn shape_reports_success_kind(#[case] kind: SuccessKind) {
        let (shape, envelope) = shape::<_, StoreError>(kind, Ok(1_u8));
        assert_eq!(shape, Shape::Success(kind));
        assert_eq!(envelope.message(), kind.message());
        assert_eq!(envelope.data(), Some(&1));
    }

    #[rstest]
    #[case(
        StoreError::NotFound { id: UserId::new(1).expect("valid id") },
        ErrorCode::NotFound
    )]
    #[case(StoreError::EmailConflict { email: "a@b.co".to_owned() }, ErrorCode::Conflict)]
    #[case(StoreError::LimitReached { max: MAX_USERS }, ErrorCode::LimitExceeded)]
    #[case(
        StoreError::Persistence(SnapshotRepositoryError::write("f", "boom")),
        ErrorCode::InternalError
    )]
    fn shape_reports_failure_code(#[case] error: StoreError, #[case] code: ErrorCode) {
        let (shape, envelope) = shape::<u8, _>(SuccessKind::Created, Err(error));
        assert_eq!(shape, Shape::Failure(code));
        assert!(!envelope.is_success());
        assert!(envelope.data().is_none());
        assert!(envelope.error().is_some());
    }

    #[rstest]
    fn limit_failure_carries_capacity_reason() {
        let (_, envelope) = shape::<u8, _>(
            SuccessKind::Created,
            Err(StoreError::LimitReached { max: MAX_USERS }),
        );
        assert_eq!(envelope.error(), Some(LIMIT_REASON));
    }
}
