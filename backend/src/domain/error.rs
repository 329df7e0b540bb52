//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! status codes and wrap them in the failure [`crate::domain::Envelope`].

use std::fmt;

use thiserror::Error as ThisError;
use tracing::error;

use crate::domain::TraceId;
use crate::domain::user_store::StoreError;

/// Reason reported when a referenced resource is absent.
pub const NOT_FOUND_REASON: &str = "resource not found";
/// Reason reported when an email is already taken.
pub const CONFLICT_REASON: &str = "email already registered";
/// Reason reported when the store is full.
pub const LIMIT_REASON: &str = "capacity exceeded";
/// Generic reason for unexpected failures. Never carries detail.
pub const INTERNAL_REASON: &str = "internal server error";

/// Stable failure category, one per failure envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The request collides with an existing resource.
    Conflict,
    /// The collection is at capacity.
    LimitExceeded,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Human-readable summary used as the envelope `message`.
    pub fn summary(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Validation failed",
            Self::NotFound => "Not found",
            Self::Conflict => "Conflict",
            Self::LimitExceeded => "User limit reached",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use user_registry::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("resource not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// Captures the current trace identifier if one is in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    /// Stable failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Reason returned to clients in the envelope `error` field.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier propagated into the response header.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::LimitExceeded`].
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LimitExceeded, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Copy safe to show to clients: internal errors lose their message.
    pub fn redacted(&self) -> Self {
        if self.code != ErrorCode::InternalError {
            return self.clone();
        }
        Self {
            code: ErrorCode::InternalError,
            message: INTERNAL_REASON.to_owned(),
            trace_id: self.trace_id.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::invalid_request(err.to_string()),
            StoreError::NotFound { .. } => Self::not_found(NOT_FOUND_REASON),
            StoreError::EmailConflict { .. } => Self::conflict(CONFLICT_REASON),
            StoreError::LimitReached { .. } => Self::limit_exceeded(LIMIT_REASON),
            StoreError::Persistence(_) | StoreError::CorruptSnapshot { .. } => {
                error!(error = %value, "store failure promoted to internal error");
                Self::internal(INTERNAL_REASON)
            }
        }
    }
}
