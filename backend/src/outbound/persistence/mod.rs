//! Snapshot persistence adapters for the user store.

mod atomic_io;
mod json_file_snapshot_repository;

pub use json_file_snapshot_repository::JsonFileUserSnapshotRepository;
