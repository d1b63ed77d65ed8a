//! Port abstraction for resolving client tenants during authentication.
use async_trait::async_trait;

use crate::domain::client::Client;

use super::define_port_error;

define_port_error! {
    /// Errors raised by client directory adapters.
    pub enum ClientDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "client directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "client directory query failed: {message}",
    }
}

/// Driven port mapping a login name to the client tenant it identifies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Look up a client by its unique login name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientDirectoryError>;
}
