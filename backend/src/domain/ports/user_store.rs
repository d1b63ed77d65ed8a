//! Port abstraction for user persistence adapters and their errors.
//!
//! Every operation is scoped to the owning client: a user that exists but
//! belongs to another client is indistinguishable from one that does not
//! exist at all.

use async_trait::async_trait;

use crate::domain::client::ClientId;
use crate::domain::user::{Email, PasswordHash, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// A uniqueness assumption was violated (duplicate match on a key
        /// expected to identify at most one record).
        NonUnique { message: String } => "user store integrity violation: {message}",
    }
}

/// Fields of a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Owning client, resolved from the authenticated principal.
    pub client_id: ClientId,
    /// Validated login name.
    pub username: Username,
    /// Validated contact email.
    pub email: Email,
    /// Already-hashed secret; plaintexts never reach the store.
    pub password_hash: PasswordHash,
}

/// Replacement fields for a full user update.
///
/// Partial updates are unsupported; every mutable field is replaced.
#[derive(Debug, Clone)]
pub struct UserChanges {
    /// Replacement login name.
    pub username: Username,
    /// Replacement contact email.
    pub email: Email,
    /// Replacement secret hash.
    pub password_hash: PasswordHash,
}

/// Driven port for user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users owned by the client, ordered by ascending id.
    async fn list_for_client(&self, client_id: ClientId) -> Result<Vec<User>, UserStoreError>;

    /// One user owned by the client, or `None` when absent or foreign.
    async fn find_for_client(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> Result<Option<User>, UserStoreError>;

    /// Insert a new user and return it with its store-assigned id.
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    /// Replace the mutable fields of a client-owned user. Returns `None`
    /// when the user is absent or owned by another client.
    async fn update(
        &self,
        client_id: ClientId,
        user_id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserStoreError>;

    /// Delete a client-owned user. Returns `false` when the user is absent
    /// or owned by another client.
    async fn delete(&self, client_id: ClientId, user_id: UserId) -> Result<bool, UserStoreError>;
}
