//! Persistence adapters for the user store and client directory ports.
//!
//! Two families live here: Diesel-backed adapters speaking PostgreSQL
//! through an async connection pool, and in-memory adapters used when no
//! database is configured and by the test suites.

mod diesel_client_directory;
mod diesel_user_store;
mod memory;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_client_directory::DieselClientDirectory;
pub use diesel_user_store::DieselUserStore;
pub use memory::{InMemoryClientDirectory, InMemoryUserStore};
