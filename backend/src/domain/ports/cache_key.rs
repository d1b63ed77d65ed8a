//! Cache key construction for cached user responses.
//!
//! Keys are built from typed parts so they are correct by construction, and
//! every key embeds the owning client so one tenant's cached responses can
//! never be served to — or invalidated by — another tenant.

use pagination::PageRequest;

use crate::domain::client::ClientId;
use crate::domain::user::UserId;

/// Structured key identifying one cached response payload.
///
/// Shapes:
/// - list pages: `users:<client>:list:<page>:<size>`
/// - detail views: `users:<client>:detail:<user>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a cached list page of the given client.
    #[must_use]
    pub fn list(client_id: ClientId, request: &PageRequest) -> Self {
        Self(format!(
            "{}{}:{}",
            Self::list_prefix(client_id),
            request.page(),
            request.size()
        ))
    }

    /// Key for a cached detail view of the given user.
    #[must_use]
    pub fn detail(client_id: ClientId, user_id: UserId) -> Self {
        Self(format!("users:{client_id}:detail:{user_id}"))
    }

    /// Prefix shared by every list-page key of the given client.
    ///
    /// Write invalidation removes this prefix wholesale because a single
    /// write can shift the content of every page.
    #[must_use]
    pub fn list_prefix(client_id: ClientId) -> String {
        format!("users:{client_id}:list:")
    }

    /// Borrow the underlying key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Key shape and tenant-scoping coverage.
    use super::*;
    use rstest::rstest;

    fn client(id: i64) -> ClientId {
        ClientId::new(id).expect("valid client id")
    }

    #[rstest]
    fn list_key_embeds_client_page_and_size() {
        let request = PageRequest::from_optional(Some(3), Some(10)).expect("valid request");
        let key = CacheKey::list(client(7), &request);
        assert_eq!(key.as_str(), "users:7:list:3:10");
    }

    #[rstest]
    fn detail_key_embeds_client_and_user() {
        let user = UserId::new(42).expect("valid user id");
        let key = CacheKey::detail(client(7), user);
        assert_eq!(key.as_str(), "users:7:detail:42");
    }

    #[rstest]
    fn list_keys_share_the_invalidation_prefix() {
        let request = PageRequest::default();
        let key = CacheKey::list(client(7), &request);
        assert!(key.as_str().starts_with(&CacheKey::list_prefix(client(7))));
        assert!(!key.as_str().starts_with(&CacheKey::list_prefix(client(8))));
    }
}
