//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and ports, and remain testable without
//! real I/O.

use std::sync::Arc;

use crate::domain::UserDirectoryService;
use crate::domain::ports::{ClientDirectory, PasswordHasher};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Use-case core serving the `/users` resource.
    pub directory: UserDirectoryService,
    /// Client tenant lookup used by the login flow.
    pub clients: Arc<dyn ClientDirectory>,
    /// Secret verification used by the login flow.
    pub hasher: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Assemble handler state from its parts.
    #[must_use]
    pub fn new(
        directory: UserDirectoryService,
        clients: Arc<dyn ClientDirectory>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            directory,
            clients,
            hasher,
        }
    }
}
