//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users        {"name":"Alice","email":"alice@example.com"}
//! PUT    /api/users/{id}   {"email":"alice@work.example"}
//! PATCH  /api/users/{id}   {"name":"Alice B."}
//! DELETE /api/users/{id}
//! ```
//!
//! Every response is an [`Envelope`](crate::domain::Envelope). All store calls
//! run on the blocking pool: mutations hold the write lock across the
//! synchronous snapshot write, and reads wait on that same lock.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CreateUser, StoreError, SuccessKind, UpdateUser, User, UserValidationError, shape,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::status_for;
use crate::inbound::http::schemas::{
    FailureEnvelopeSchema, UserEnvelopeSchema, UserListEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_user_id, validation_error};

/// Request body for `POST /api/users`.
///
/// Example JSON:
/// `{"name":"Alice","email":"alice@example.com"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

impl TryFrom<CreateUserRequest> for CreateUser {
    type Error = UserValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.name, value.email)
    }
}

/// Request body for `PUT` and `PATCH /api/users/{id}`. At least one field is
/// required; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Alice B.")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice@work.example")]
    pub email: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UpdateUser {
    type Error = UserValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.name, value.email)
    }
}

fn respond<T: Serialize>(kind: SuccessKind, result: Result<T, StoreError>) -> HttpResponse {
    let (outcome, envelope) = shape(kind, result);
    HttpResponse::build(status_for(outcome)).json(envelope)
}

/// List all users in insertion order.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = UserListEnvelopeSchema),
        (status = 500, description = "Internal server error", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let store = state.users.clone();
    let users: Vec<User> = web::block(move || store.list()).await?;
    Ok(respond(SuccessKind::Listed, Ok(users)))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u16, Path, description = "User id between 1 and 999")),
    responses(
        (status = 200, description = "User", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid id", body = FailureEnvelopeSchema),
        (status = 404, description = "No such user", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let store = state.users.clone();
    let result = web::block(move || store.get_by_id(id)).await?;
    Ok(respond(SuccessKind::Retrieved, result))
}

/// Register a new user. The server assigns the id.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid input or user limit reached", body = FailureEnvelopeSchema),
        (status = 409, description = "Email already registered", body = FailureEnvelopeSchema),
        (status = 500, description = "Internal server error", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let input = CreateUser::try_from(payload.into_inner()).map_err(validation_error)?;
    let store = state.users.clone();
    let result = web::block(move || store.create(input)).await?;
    Ok(respond(SuccessKind::Created, result))
}

async fn apply_update(
    state: web::Data<HttpState>,
    raw_id: &str,
    payload: UpdateUserRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(raw_id)?;
    let changes = UpdateUser::try_from(payload).map_err(validation_error)?;
    let store = state.users.clone();
    let result = web::block(move || store.update(id, changes)).await?;
    Ok(respond(SuccessKind::Updated, result))
}

/// Replace the supplied fields of a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u16, Path, description = "User id between 1 and 999")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid id or input", body = FailureEnvelopeSchema),
        (status = 404, description = "No such user", body = FailureEnvelopeSchema),
        (status = 409, description = "Email already registered", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn put_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    apply_update(state, &path, payload.into_inner()).await
}

/// Partially update a user. Same semantics as `PUT`.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = u16, Path, description = "User id between 1 and 999")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid id or input", body = FailureEnvelopeSchema),
        (status = 404, description = "No such user", body = FailureEnvelopeSchema),
        (status = 409, description = "Email already registered", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    apply_update(state, &path, payload.into_inner()).await
}

/// Remove a user and return the removed record.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u16, Path, description = "User id between 1 and 999")),
    responses(
        (status = 200, description = "User deleted", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid id", body = FailureEnvelopeSchema),
        (status = 404, description = "No such user", body = FailureEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let store = state.users.clone();
    let result = web::block(move || store.delete_by_id(id)).await?;
    Ok(respond(SuccessKind::Deleted, result))
}
