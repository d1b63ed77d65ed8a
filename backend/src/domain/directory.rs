//! User directory use-cases: cached reads and invalidating writes.
//!
//! Reads consult the response cache before the store and populate it on a
//! miss; cache failures are logged and treated as misses so a degraded
//! cache never fails a request. Writes invalidate by key scope: the touched
//! user's detail entry and every list page of the owning client are removed
//! after the store mutation succeeds, before the caller sees the response.
//! A write followed by a read of the same resource therefore observes the
//! write.
//!
//! One race is accepted: a concurrent read that loaded from the store
//! before a write committed may re-populate the cache just after that
//! write's invalidation, leaving a stale entry until the next write to the
//! same scope. Closing it would need a version tag on every key; the
//! sequential consistency the endpoints promise does not require that.

use std::sync::Arc;

use pagination::{PageEnvelope, PageRequest, paginate};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::client::ClientId;
use super::error::Error;
use super::ports::{
    CacheKey, NewUser, PasswordHasher, PasswordHasherError, ResponseCache, UserChanges, UserStore,
    UserStoreError,
};
use super::user::{UserDraft, UserId, UserView};
use super::DomainResult;

/// Message returned when a user is absent or owned by another client.
///
/// Foreign users are deliberately indistinguishable from missing ones.
pub const NO_SUCH_USER: &str = "this user does not exist";

/// Use-case core for the `/users` resource.
///
/// Holds the driven ports behind `Arc` so one instance serves every
/// concurrent request.
#[derive(Clone)]
pub struct UserDirectoryService {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn ResponseCache>,
    hasher: Arc<dyn PasswordHasher>,
}

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        // NonUnique is a data-integrity violation; it is fatal for the
        // request and surfaces as an internal error at the boundary.
        UserStoreError::Query { message } | UserStoreError::NonUnique { message } => {
            Error::internal(message)
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    let PasswordHasherError::Hash { message } = error;
    Error::internal(message)
}

impl UserDirectoryService {
    /// Assemble the service from its driven ports.
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn ResponseCache>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
        }
    }

    /// List the client's users as a cached page envelope.
    pub async fn list_users(
        &self,
        client_id: ClientId,
        request: PageRequest,
    ) -> DomainResult<PageEnvelope<UserView>> {
        let key = CacheKey::list(client_id, &request);
        if let Some(envelope) = self.cached(&key).await {
            return Ok(envelope);
        }

        let users = self
            .store
            .list_for_client(client_id)
            .await
            .map_err(map_store_error)?;
        let views: Vec<UserView> = users.iter().map(UserView::from).collect();
        let envelope = paginate(&views, &request);
        self.populate(&key, &envelope).await;
        Ok(envelope)
    }

    /// Fetch one client-owned user as a cached detail view.
    pub async fn get_user(&self, client_id: ClientId, user_id: UserId) -> DomainResult<UserView> {
        let key = CacheKey::detail(client_id, user_id);
        if let Some(view) = self.cached(&key).await {
            return Ok(view);
        }

        let user = self
            .store
            .find_for_client(client_id, user_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(NO_SUCH_USER))?;
        let view = UserView::from(&user);
        self.populate(&key, &view).await;
        Ok(view)
    }

    /// Create a user owned by the client, hashing the draft's password
    /// before it reaches the store.
    pub async fn create_user(
        &self,
        client_id: ClientId,
        draft: UserDraft,
    ) -> DomainResult<UserView> {
        let password_hash = self
            .hasher
            .hash(draft.password())
            .await
            .map_err(map_hasher_error)?;

        let user = self
            .store
            .insert(NewUser {
                client_id,
                username: draft.username().clone(),
                email: draft.email().clone(),
                password_hash,
            })
            .await
            .map_err(map_store_error)?;

        self.invalidate(client_id, user.id()).await;
        Ok(UserView::from(&user))
    }

    /// Replace every mutable field of a client-owned user.
    pub async fn update_user(
        &self,
        client_id: ClientId,
        user_id: UserId,
        draft: UserDraft,
    ) -> DomainResult<UserView> {
        let password_hash = self
            .hasher
            .hash(draft.password())
            .await
            .map_err(map_hasher_error)?;

        let user = self
            .store
            .update(
                client_id,
                user_id,
                UserChanges {
                    username: draft.username().clone(),
                    email: draft.email().clone(),
                    password_hash,
                },
            )
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(NO_SUCH_USER))?;

        self.invalidate(client_id, user_id).await;
        Ok(UserView::from(&user))
    }

    /// Delete a client-owned user.
    pub async fn delete_user(&self, client_id: ClientId, user_id: UserId) -> DomainResult<()> {
        let deleted = self
            .store
            .delete(client_id, user_id)
            .await
            .map_err(map_store_error)?;
        if !deleted {
            return Err(Error::not_found(NO_SUCH_USER));
        }

        self.invalidate(client_id, user_id).await;
        Ok(())
    }

    /// Probe the cache, treating any failure as a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = match self.cache.get(key).await {
            Ok(value) => value?,
            Err(error) => {
                warn!(key = %key, %error, "cache lookup failed; falling open to the store");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(payload) => Some(payload),
            Err(error) => {
                warn!(key = %key, %error, "cached payload is malformed; refetching");
                None
            }
        }
    }

    /// Store a freshly built payload; population failures only degrade
    /// caching, so they are logged and swallowed.
    async fn populate<T: serde::Serialize>(&self, key: &CacheKey, payload: &T) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(error) => {
                warn!(key = %key, %error, "failed to serialise payload for caching");
                return;
            }
        };
        if let Err(error) = self.cache.put(key, &value).await {
            warn!(key = %key, %error, "cache population failed");
        }
    }

    /// Key-scoped invalidation after a successful write: the touched
    /// user's detail entry plus every list page of the owning client.
    async fn invalidate(&self, client_id: ClientId, user_id: UserId) {
        let detail_key = CacheKey::detail(client_id, user_id);
        if let Err(error) = self.cache.remove(&detail_key).await {
            warn!(key = %detail_key, %error, "detail invalidation failed");
        }
        let prefix = CacheKey::list_prefix(client_id);
        if let Err(error) = self.cache.remove_prefix(&prefix).await {
            warn!(%prefix, %error, "list invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Cache policy and error-mapping coverage with mocked ports.
    use super::*;
    use crate::domain::ports::{
        MockPasswordHasher, MockResponseCache, MockUserStore, ResponseCacheError,
    };
    use crate::domain::user::{Email, PasswordHash, User, Username};
    use crate::domain::ErrorCode;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::json;

    fn client(id: i64) -> ClientId {
        ClientId::new(id).expect("valid client id")
    }

    fn user_id(id: i64) -> UserId {
        UserId::new(id).expect("valid user id")
    }

    fn sample_user(id: i64, owner: i64, username: &str, email: &str) -> User {
        User::new(
            user_id(id),
            client(owner),
            Username::new(username).expect("valid username"),
            Email::new(email).expect("valid email"),
            PasswordHash::new("$argon2id$stub".to_owned()),
        )
    }

    fn sample_draft() -> UserDraft {
        UserDraft::try_from_parts("alice", "secret", "a@x.com").expect("valid draft")
    }

    fn service(
        store: MockUserStore,
        cache: MockResponseCache,
        hasher: MockPasswordHasher,
    ) -> UserDirectoryService {
        UserDirectoryService::new(Arc::new(store), Arc::new(cache), Arc::new(hasher))
    }

    #[rstest]
    #[tokio::test]
    async fn list_hit_short_circuits_the_store() {
        let envelope = PageEnvelope::<UserView> {
            items: vec![UserView {
                id: 1,
                username: "alice".to_owned(),
                email: "a@x.com".to_owned(),
            }],
            page: 1,
            page_size: 2,
            total_items: 1,
            total_pages: 1,
        };
        let cached = serde_json::to_value(&envelope).expect("serialisable envelope");

        let mut cache = MockResponseCache::new();
        cache
            .expect_get()
            .withf(|key| key.as_str() == "users:7:list:1:2")
            .return_once(move |_| Ok(Some(cached)));
        // The store mock has no expectations: any call panics the test.
        let svc = service(MockUserStore::new(), cache, MockPasswordHasher::new());

        let result = svc
            .list_users(client(7), PageRequest::default())
            .await
            .expect("cached list");
        assert_eq!(result, envelope);
    }

    #[rstest]
    #[tokio::test]
    async fn list_miss_queries_store_and_populates_cache() {
        let mut cache = MockResponseCache::new();
        cache.expect_get().return_once(|_| Ok(None));
        cache
            .expect_put()
            .withf(|key, value| {
                key.as_str() == "users:7:list:1:2"
                    && value.get("items").is_some_and(|items| {
                        items.as_array().is_some_and(|items| items.len() == 2)
                    })
            })
            .return_once(|_, _| Ok(()));

        let mut store = MockUserStore::new();
        store
            .expect_list_for_client()
            .with(eq(client(7)))
            .return_once(|_| {
                Ok(vec![
                    sample_user(1, 7, "alice", "a@x.com"),
                    sample_user(2, 7, "bob", "b@x.com"),
                    sample_user(3, 7, "carol", "c@x.com"),
                ])
            });

        let svc = service(store, cache, MockPasswordHasher::new());
        let envelope = svc
            .list_users(client(7), PageRequest::default())
            .await
            .expect("listed users");
        assert_eq!(envelope.total_items, 3);
        assert_eq!(envelope.total_pages, 2);
        assert_eq!(envelope.items.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn cache_backend_failure_falls_open_to_the_store() {
        let mut cache = MockResponseCache::new();
        cache
            .expect_get()
            .return_once(|_| Err(ResponseCacheError::backend("connection refused")));
        cache.expect_put().return_once(|_, _| Ok(()));

        let mut store = MockUserStore::new();
        store
            .expect_find_for_client()
            .return_once(|_, _| Ok(Some(sample_user(4, 7, "dan", "d@x.com"))));

        let svc = service(store, cache, MockPasswordHasher::new());
        let view = svc
            .get_user(client(7), user_id(4))
            .await
            .expect("store-served view");
        assert_eq!(view.id, 4);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_cached_payload_is_refetched() {
        let mut cache = MockResponseCache::new();
        cache
            .expect_get()
            .return_once(|_| Ok(Some(json!({ "unexpected": true }))));
        cache.expect_put().return_once(|_, _| Ok(()));

        let mut store = MockUserStore::new();
        store
            .expect_find_for_client()
            .return_once(|_, _| Ok(Some(sample_user(4, 7, "dan", "d@x.com"))));

        let svc = service(store, cache, MockPasswordHasher::new());
        let view = svc.get_user(client(7), user_id(4)).await.expect("view");
        assert_eq!(view.username, "dan");
    }

    #[rstest]
    #[tokio::test]
    async fn get_absent_user_is_not_found() {
        let mut cache = MockResponseCache::new();
        cache.expect_get().return_once(|_| Ok(None));
        let mut store = MockUserStore::new();
        store.expect_find_for_client().return_once(|_, _| Ok(None));

        let svc = service(store, cache, MockPasswordHasher::new());
        let err = svc
            .get_user(client(7), user_id(9))
            .await
            .expect_err("absent user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), NO_SUCH_USER);
    }

    #[rstest]
    #[tokio::test]
    async fn create_hashes_before_insert_and_invalidates() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|plaintext| plaintext == "secret")
            .return_once(|_| Ok(PasswordHash::new("$argon2id$hashed".to_owned())));

        let mut store = MockUserStore::new();
        store
            .expect_insert()
            .withf(|new_user| {
                new_user.password_hash.as_str() == "$argon2id$hashed"
                    && new_user.client_id == ClientId::new(7).expect("valid client id")
            })
            .return_once(|new_user| {
                Ok(User::new(
                    UserId::new(10).expect("valid id"),
                    new_user.client_id,
                    new_user.username,
                    new_user.email,
                    new_user.password_hash,
                ))
            });

        let mut cache = MockResponseCache::new();
        cache
            .expect_remove()
            .withf(|key| key.as_str() == "users:7:detail:10")
            .return_once(|_| Ok(()));
        cache
            .expect_remove_prefix()
            .with(eq("users:7:list:"))
            .return_once(|_| Ok(()));

        let svc = service(store, cache, hasher);
        let view = svc
            .create_user(client(7), sample_draft())
            .await
            .expect("created user");
        assert_eq!(view.id, 10);
        assert_eq!(view.username, "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn update_absent_user_is_not_found_and_skips_invalidation() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("$argon2id$hashed".to_owned())));
        let mut store = MockUserStore::new();
        store.expect_update().return_once(|_, _, _| Ok(None));

        // No cache expectations: invalidation must not run for a failed write.
        let svc = service(store, MockResponseCache::new(), hasher);
        let err = svc
            .update_user(client(7), user_id(9), sample_draft())
            .await
            .expect_err("absent user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_invalidates_detail_and_list_scope() {
        let mut store = MockUserStore::new();
        store
            .expect_delete()
            .with(eq(client(7)), eq(user_id(4)))
            .return_once(|_, _| Ok(true));

        let mut cache = MockResponseCache::new();
        cache
            .expect_remove()
            .withf(|key| key.as_str() == "users:7:detail:4")
            .return_once(|_| Ok(()));
        cache
            .expect_remove_prefix()
            .with(eq("users:7:list:"))
            .return_once(|_| Ok(()));

        let svc = service(store, cache, MockPasswordHasher::new());
        svc.delete_user(client(7), user_id(4))
            .await
            .expect("deleted user");
    }

    #[rstest]
    #[tokio::test]
    async fn non_unique_store_failure_surfaces_as_internal() {
        let mut cache = MockResponseCache::new();
        cache.expect_get().return_once(|_| Ok(None));
        let mut store = MockUserStore::new();
        store.expect_find_for_client().return_once(|_, _| {
            Err(UserStoreError::non_unique("duplicate user id match"))
        });

        let svc = service(store, cache, MockPasswordHasher::new());
        let err = svc
            .get_user(client(7), user_id(4))
            .await
            .expect_err("integrity violation");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
