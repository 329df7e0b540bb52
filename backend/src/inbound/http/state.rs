//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`. The store is shared
//! behind an `Arc` so blocking mutations can move a handle onto the blocking
//! thread pool.

use std::sync::Arc;

use crate::domain::UserStore;

/// Dependency bundle for HTTP handlers.
#[derive(Debug, Clone)]
pub struct HttpState {
    pub users: Arc<UserStore>,
}

impl HttpState {
    /// Construct state around the live user store.
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }
}
