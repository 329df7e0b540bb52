//! Port abstraction for persisting the user collection as a whole.
//!
//! The store loads every collection once at startup and hands the full user
//! list back after each successful mutation. Adapters decide how the snapshot
//! is written; they must have finished (or durably queued) the write before
//! `persist` returns.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::User;

/// Key of the user collection inside a snapshot.
pub const USERS_COLLECTION: &str = "users";

/// Every stored collection keyed by name.
pub type UserSnapshot = BTreeMap<String, Vec<User>>;

/// Persistence errors raised by snapshot adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotRepositoryError {
    /// The backing store could not be read.
    #[error("failed to read user snapshot at '{path}': {message}")]
    Read { path: String, message: String },
    /// The backing store holds data that does not decode into users.
    #[error("invalid user snapshot at '{path}': {message}")]
    Decode { path: String, message: String },
    /// The snapshot could not be written.
    #[error("failed to write user snapshot at '{path}': {message}")]
    Write { path: String, message: String },
}

impl SnapshotRepositoryError {
    pub fn read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Outbound port for loading and saving the user collection.
#[cfg_attr(test, mockall::automock)]
pub trait UserSnapshotRepository: Send + Sync {
    /// Load every stored collection. A store with nothing saved yet returns an
    /// empty map.
    fn load_all(&self) -> Result<UserSnapshot, SnapshotRepositoryError>;

    /// Replace the stored user collection with `users`.
    fn persist(&self, users: &[User]) -> Result<(), SnapshotRepositoryError>;
}

/// Adapter used when persistence is disabled: nothing is loaded or written.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserSnapshotRepository;

impl UserSnapshotRepository for NoOpUserSnapshotRepository {
    fn load_all(&self) -> Result<UserSnapshot, SnapshotRepositoryError> {
        Ok(UserSnapshot::new())
    }

    fn persist(&self, _users: &[User]) -> Result<(), SnapshotRepositoryError> {
        Ok(())
    }
}
