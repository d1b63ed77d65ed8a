//! In-memory persistence adapters.
//!
//! Used when no database is configured and by the test suites. Identifier
//! assignment mirrors a PostgreSQL sequence: monotonically increasing and
//! never reused, even after deletes.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::ports::{
    ClientDirectory, ClientDirectoryError, NewUser, UserChanges, UserStore, UserStoreError,
};
use crate::domain::{Client, ClientId, User, UserId};

/// Concurrent in-memory implementation of the [`UserStore`] port.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<i64, User>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn assign_id(&self) -> Result<UserId, UserStoreError> {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        UserId::new(raw).map_err(|error| UserStoreError::query(error.to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_for_client(&self, client_id: ClientId) -> Result<Vec<User>, UserStoreError> {
        let mut owned: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.value().client_id() == client_id)
            .map(|entry| entry.value().clone())
            .collect();
        owned.sort_by_key(User::id);
        Ok(owned)
    }

    async fn find_for_client(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .users
            .get(&user_id.get())
            .filter(|entry| entry.value().client_id() == client_id)
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let id = self.assign_id()?;
        let user = User::new(
            id,
            new_user.client_id,
            new_user.username,
            new_user.email,
            new_user.password_hash,
        );
        self.users.insert(id.get(), user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        client_id: ClientId,
        user_id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserStoreError> {
        let Some(mut entry) = self.users.get_mut(&user_id.get()) else {
            return Ok(None);
        };
        if entry.value().client_id() != client_id {
            return Ok(None);
        }
        let updated = User::new(
            user_id,
            client_id,
            changes.username,
            changes.email,
            changes.password_hash,
        );
        *entry.value_mut() = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, client_id: ClientId, user_id: UserId) -> Result<bool, UserStoreError> {
        let removed = self
            .users
            .remove_if(&user_id.get(), |_, user| user.client_id() == client_id);
        Ok(removed.is_some())
    }
}

/// Concurrent in-memory implementation of the [`ClientDirectory`] port,
/// keyed by the unique client name.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: DashMap<String, Client>,
}

impl InMemoryClientDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client, replacing any prior entry with the same name.
    pub fn register(&self, client: Client) {
        self.clients.insert(client.name().to_owned(), client);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientDirectoryError> {
        Ok(self.clients.get(name).map(|entry| entry.value().clone()))
    }
}
