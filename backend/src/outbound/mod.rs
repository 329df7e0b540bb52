//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: JSON file snapshots of the user collection.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules.

pub mod persistence;
