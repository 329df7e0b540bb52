//! Domain ports for the hexagonal boundary.
//!
//! The store depends only on these traits; concrete adapters live under
//! [`crate::outbound`].

mod user_snapshot_repository;

#[cfg(test)]
pub use user_snapshot_repository::MockUserSnapshotRepository;
pub use user_snapshot_repository::{
    NoOpUserSnapshotRepository, SnapshotRepositoryError, USERS_COLLECTION, UserSnapshot,
    UserSnapshotRepository,
};
