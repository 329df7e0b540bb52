//! Domain primitives, the user store, and the response envelope.
//!
//! Purpose: hold every rule about users (field validation, id allocation,
//! uniqueness, capacity) and the mapping of outcomes onto the uniform
//! envelope, independent of HTTP and of the storage medium.
//!
//! Public surface:
//! - `User`, `UserId`, `UserName`, `EmailAddress`: validated user values.
//! - `UserStore`: owner of the live collection.
//! - `Envelope`, `Shape`, `SuccessKind`: response shaping.
//! - `Error`, `ErrorCode`: transport-agnostic failures.
//! - `TraceId`: request correlation identifier.

pub mod envelope;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_store;

pub use self::envelope::{Envelope, Shape, SuccessKind, shape};
pub use self::error::{
    CONFLICT_REASON, Error, ErrorCode, ErrorValidationError, INTERNAL_REASON, LIMIT_REASON,
    NOT_FOUND_REASON,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CreateUser, EmailAddress, MAX_USERS, NAME_MAX, UpdateUser, User, UserId, UserName,
    UserValidationError,
};
pub use self::user_store::{IdAllocationPolicy, StoreError, UnknownIdAllocationPolicy, UserStore};
