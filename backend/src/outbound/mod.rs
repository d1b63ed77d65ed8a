//! Outbound adapters implementing the domain's driven ports.
//!
//! Purpose: Keep infrastructure concerns (cache backends, PostgreSQL,
//! password hashing) behind the port traits so the domain stays
//! framework-free.

pub mod cache;
pub mod persistence;
pub mod security;
