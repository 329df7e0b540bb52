//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's path so handler annotations can name the domain type directly.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Server-assigned identifier between 1 and 999.
    #[schema(minimum = 1, maximum = 999, example = 1)]
    id: u16,
    /// Display name, 1 to 50 characters after trimming.
    #[schema(min_length = 1, max_length = 50, example = "Alice")]
    name: String,
    /// Email address as supplied; unique ignoring case.
    #[schema(example = "alice@example.com")]
    email: String,
}

/// Success envelope wrapping a single user.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "User retrieved successfully")]
    message: String,
    data: UserSchema,
}

/// Success envelope wrapping the user list.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserListEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Users retrieved successfully")]
    message: String,
    data: Vec<UserSchema>,
}

/// Failure envelope returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FailureEnvelopeSchema {
    #[schema(example = false)]
    success: bool,
    /// Category summary such as `Validation failed` or `Conflict`.
    #[schema(example = "Conflict")]
    message: String,
    /// Specific reason.
    #[schema(example = "email already registered")]
    error: String,
}
