//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod client_directory;
mod password_hasher;
mod response_cache;
mod user_store;

pub use cache_key::CacheKey;
#[cfg(test)]
pub use client_directory::MockClientDirectory;
pub use client_directory::{ClientDirectory, ClientDirectoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use response_cache::MockResponseCache;
pub use response_cache::{ResponseCache, ResponseCacheError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{NewUser, UserChanges, UserStore, UserStoreError};
