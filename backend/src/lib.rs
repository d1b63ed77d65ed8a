//! Client-scoped user directory service.
//!
//! A REST resource of `User` records owned by `Client` tenants, with a
//! read-through response cache in front of the list and detail endpoints
//! and key-scoped invalidation after every write. The crate follows a
//! hexagonal layout: `domain` holds transport-agnostic types, ports, and
//! the use-case core; `inbound` holds the HTTP adapter; `outbound` holds
//! cache, persistence, and hashing adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use domain::TraceId;
pub use middleware::trace::Trace;
