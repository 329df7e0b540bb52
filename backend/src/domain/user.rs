//! User data model.
//!
//! Every field is a validated newtype so the store only ever sees values that
//! already satisfy the per-field rules. Collection-wide rules (uniqueness,
//! capacity) live in [`crate::domain::UserStore`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of live users, and the largest assignable identifier.
pub const MAX_USERS: usize = 999;
/// Maximum allowed length for a user name, in characters.
pub const NAME_MAX: usize = 50;

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("id must be an integer between 1 and {max}")]
    InvalidId { max: usize },
    #[error("id must be between 1 and {max}, got {value}")]
    IdOutOfRange { value: i64, max: usize },
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must be a valid address such as user@example.com")]
    InvalidEmail,
    #[error("update must include at least one of name or email")]
    EmptyUpdate,
}

/// Server-assigned user identifier in `1..=MAX_USERS`.
///
/// # Examples
/// ```
/// use user_registry::domain::UserId;
///
/// assert_eq!(UserId::new(1).map(|id| id.get()), Ok(1));
/// assert!(UserId::new(0).is_err());
/// assert!(UserId::parse("1000").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct UserId(u16);

impl UserId {
    /// Validate and construct an identifier from a signed integer.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        let max = MAX_USERS;
        if value < 1 || value > max as i64 {
            return Err(UserValidationError::IdOutOfRange { value, max });
        }
        u16::try_from(value)
            .map(Self)
            .map_err(|_| UserValidationError::IdOutOfRange { value, max })
    }

    /// Parse an identifier supplied as text, e.g. a path segment.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| UserValidationError::InvalidId { max: MAX_USERS })?;
        Self::new(value)
    }

    /// Raw numeric value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for u16 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable user name, 1 to [`NAME_MAX`] characters.
///
/// Surrounding whitespace is trimmed before validation and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address in `local@domain.tld` form.
///
/// The submitted casing is preserved; comparisons for uniqueness go through
/// [`EmailAddress::same_as`], which ignores case.
///
/// # Examples
/// ```
/// use user_registry::domain::EmailAddress;
///
/// let lower = EmailAddress::new("alice@example.com").expect("valid email");
/// let upper = EmailAddress::new("ALICE@EXAMPLE.COM").expect("valid email");
/// assert!(lower.same_as(&upper));
/// assert_eq!(upper.as_ref(), "ALICE@EXAMPLE.COM");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = email.into();
        if !email_regex().is_match(&raw) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(raw))
    }

    /// Lowercased form used as the uniqueness key.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality.
    pub fn same_as(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A registered user.
///
/// ## Invariants
/// - `id` lies within `1..=MAX_USERS` and never changes after creation.
/// - `name` and `email` satisfy their newtype rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, name: UserName, email: EmailAddress) -> Self {
        Self { id, name, email }
    }

    /// Fallible constructor from primitive inputs.
    pub fn try_from_parts(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            UserId::new(id)?,
            UserName::new(name)?,
            EmailAddress::new(email)?,
        ))
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Current email, with the casing it was submitted in.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub(crate) fn set_name(&mut self, name: UserName) {
        self.name = name;
    }

    pub(crate) fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserDto {
    id: i64,
    name: String,
    email: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, name, email } = value;
        Self {
            id: i64::from(id.get()),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_from_parts(value.id, value.name, value.email)
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub name: UserName,
    pub email: EmailAddress,
}

impl CreateUser {
    /// Validate raw name and email into a creation request.
    pub fn try_from_parts(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
        })
    }
}

/// Validated partial update; absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
}

impl UpdateUser {
    /// Validate optional raw fields. At least one must be present.
    pub fn try_from_parts(
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Self, UserValidationError> {
        if name.is_none() && email.is_none() {
            return Err(UserValidationError::EmptyUpdate);
        }
        Ok(Self {
            name: name.map(UserName::new).transpose()?,
            email: email.map(EmailAddress::new).transpose()?,
        })
    }
}
