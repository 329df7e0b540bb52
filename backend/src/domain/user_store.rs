//! Canonical in-memory user collection.
//!
//! [`UserStore`] owns every live [`User`] and enforces the collection rules on
//! each mutation:
//!
//! - ids are unique and lie within `1..=MAX_USERS`;
//! - emails are unique ignoring case (stored casing is preserved);
//! - the collection never holds more than [`MAX_USERS`] records.
//!
//! All state sits behind a single [`RwLock`]. Mutations hold the write guard
//! across the whole check-then-act sequence, including the synchronous call to
//! the snapshot port, so concurrent requests cannot interleave between a
//! uniqueness check and the insert it guards.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::ports::{
    NoOpUserSnapshotRepository, SnapshotRepositoryError, USERS_COLLECTION,
    UserSnapshotRepository,
};
use crate::domain::{
    CreateUser, EmailAddress, MAX_USERS, UpdateUser, User, UserId, UserValidationError,
};

/// Outcome failures of store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Input or allocated id breaks a field rule.
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    /// No record has the requested id.
    #[error("user {id} not found")]
    NotFound { id: UserId },
    /// Another record already uses this email, ignoring case.
    #[error("email {email} already registered")]
    EmailConflict { email: String },
    /// The collection is full.
    #[error("user limit of {max} reached")]
    LimitReached { max: usize },
    /// The mutation applied in memory but the snapshot write failed.
    #[error("user snapshot could not be persisted: {0}")]
    Persistence(#[from] SnapshotRepositoryError),
    /// A loaded snapshot breaks a collection invariant.
    #[error("user snapshot rejected: {reason}")]
    CorruptSnapshot { reason: String },
}

/// How the next user id is chosen.
///
/// - `Monotonic`: an in-process counter seeded from the highest loaded id.
///   Ids never repeat within one process run, even after deletion. The
///   counter is not persisted, so after a restart a deleted id above the
///   highest surviving id can be assigned again.
/// - `MaxPlusOne`: one more than the highest live id. Deleting the record with
///   the highest id makes that id available again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdAllocationPolicy {
    #[default]
    Monotonic,
    MaxPlusOne,
}

/// Raised when an id allocation policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown id allocation policy '{0}', expected 'monotonic' or 'max-plus-one'")]
pub struct UnknownIdAllocationPolicy(pub String);

impl FromStr for IdAllocationPolicy {
    type Err = UnknownIdAllocationPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(Self::Monotonic),
            "max-plus-one" | "max_plus_one" => Ok(Self::MaxPlusOne),
            other => Err(UnknownIdAllocationPolicy(other.to_owned())),
        }
    }
}

impl fmt::Display for IdAllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monotonic => f.write_str("monotonic"),
            Self::MaxPlusOne => f.write_str("max-plus-one"),
        }
    }
}

#[derive(Debug)]
struct StoreState {
    users: Vec<User>,
    next_id: i64,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    fn from_users(users: Vec<User>) -> Result<Self, StoreError> {
        if users.len() > MAX_USERS {
            return Err(StoreError::CorruptSnapshot {
                reason: format!("{} users exceed the limit of {MAX_USERS}", users.len()),
            });
        }
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        for user in &users {
            if !ids.insert(user.id()) {
                return Err(StoreError::CorruptSnapshot {
                    reason: format!("duplicate id {}", user.id()),
                });
            }
            if !emails.insert(user.email().normalized()) {
                return Err(StoreError::CorruptSnapshot {
                    reason: format!("duplicate email {}", user.email()),
                });
            }
        }
        let mut state = Self { users, next_id: 1 };
        state.next_id = state.max_id() + 1;
        Ok(state)
    }

    fn max_id(&self) -> i64 {
        self.users
            .iter()
            .map(|user| i64::from(user.id().get()))
            .max()
            .unwrap_or(0)
    }

    fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    fn find_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.id() == id)
    }

    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .filter(|user| Some(user.id()) != except)
            .any(|user| user.email().same_as(email))
    }

    fn allocate(&self, policy: IdAllocationPolicy) -> Result<UserId, StoreError> {
        let candidate = match policy {
            IdAllocationPolicy::Monotonic => self.next_id,
            IdAllocationPolicy::MaxPlusOne => self.max_id() + 1,
        };
        Ok(UserId::new(candidate)?)
    }
}

/// Thread-safe owner of the user collection.
///
/// # Examples
/// ```
/// use user_registry::domain::{CreateUser, UserStore};
///
/// let store = UserStore::in_memory();
/// let input = CreateUser::try_from_parts("Alice", "alice@example.com").expect("valid input");
/// let alice = store.create(input).expect("created");
/// assert_eq!(alice.id().get(), 1);
/// assert_eq!(store.list(), vec![alice]);
/// ```
pub struct UserStore {
    state: RwLock<StoreState>,
    policy: IdAllocationPolicy,
    snapshots: Arc<dyn UserSnapshotRepository>,
}

impl fmt::Debug for UserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserStore")
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl UserStore {
    /// Create an empty store writing through `snapshots`.
    pub fn new(snapshots: Arc<dyn UserSnapshotRepository>, policy: IdAllocationPolicy) -> Self {
        Self {
            state: RwLock::new(StoreState::empty()),
            policy,
            snapshots,
        }
    }

    /// Empty, non-persistent store using monotonic ids.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(NoOpUserSnapshotRepository),
            IdAllocationPolicy::Monotonic,
        )
    }

    /// Build a store from whatever `snapshots` currently holds.
    ///
    /// # Errors
    /// [`StoreError::Persistence`] when the snapshot cannot be read and
    /// [`StoreError::CorruptSnapshot`] when it breaks a collection invariant.
    pub fn load(
        snapshots: Arc<dyn UserSnapshotRepository>,
        policy: IdAllocationPolicy,
    ) -> Result<Self, StoreError> {
        let mut collections = snapshots.load_all()?;
        let users = collections.remove(USERS_COLLECTION).unwrap_or_default();
        let state = StoreState::from_users(users)?;
        info!(
            users = state.users.len(),
            next_id = state.next_id,
            %policy,
            "user store loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
            policy,
            snapshots,
        })
    }

    /// Maximum number of live users.
    pub fn capacity(&self) -> usize {
        MAX_USERS
    }

    /// Number of live users.
    pub fn len(&self) -> usize {
        self.state.read().users.len()
    }

    /// Whether the store holds no users.
    pub fn is_empty(&self) -> bool {
        self.state.read().users.is_empty()
    }

    /// All users in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    /// Fetch a single user.
    pub fn get_by_id(&self, id: UserId) -> Result<User, StoreError> {
        self.state
            .read()
            .find(id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// Register a new user and assign its id.
    ///
    /// Checks run in order: capacity, email uniqueness, id allocation.
    pub fn create(&self, input: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write();
        if state.users.len() >= MAX_USERS {
            return Err(StoreError::LimitReached { max: MAX_USERS });
        }
        if state.email_taken(&input.email, None) {
            return Err(StoreError::EmailConflict {
                email: input.email.into(),
            });
        }
        let id = state.allocate(self.policy)?;
        let user = User::new(id, input.name, input.email);
        state.users.push(user.clone());
        state.next_id = state.next_id.max(i64::from(id.get()) + 1);
        info!(user_id = %id, "user created");

        self.persist(&state.users)?;
        Ok(user)
    }

    /// Apply the supplied fields to an existing user.
    pub fn update(&self, id: UserId, changes: UpdateUser) -> Result<User, StoreError> {
        let mut state = self.state.write();
        if state.find(id).is_none() {
            return Err(StoreError::NotFound { id });
        }
        if let Some(email) = changes
            .email
            .as_ref()
            .filter(|email| state.email_taken(email, Some(id)))
        {
            return Err(StoreError::EmailConflict {
                email: email.to_string(),
            });
        }
        let UpdateUser { name, email } = changes;
        let user = state.find_mut(id).ok_or(StoreError::NotFound { id })?;
        if let Some(value) = name {
            user.set_name(value);
        }
        if let Some(value) = email {
            user.set_email(value);
        }
        let updated = user.clone();
        info!(user_id = %id, "user updated");

        self.persist(&state.users)?;
        Ok(updated)
    }

    /// Remove a user and return the removed record.
    pub fn delete_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let mut state = self.state.write();
        let position = state
            .users
            .iter()
            .position(|user| user.id() == id)
            .ok_or(StoreError::NotFound { id })?;
        let removed = state.users.remove(position);
        info!(user_id = %id, "user deleted");

        self.persist(&state.users)?;
        Ok(removed)
    }

    fn persist(&self, users: &[User]) -> Result<(), StoreError> {
        self.snapshots.persist(users).map_err(|err| {
            error!(error = %err, "user snapshot write failed; change kept in memory only");
            StoreError::Persistence(err)
        })
    }
}
