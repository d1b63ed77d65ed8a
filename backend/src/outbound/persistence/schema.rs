//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Client tenants table.
    ///
    /// Each row is one API tenant; the `name` column is unique and acts as
    /// the login identifier.
    clients (id) {
        /// Primary key: store-assigned identifier.
        id -> BigInt,
        /// Unique login name of the tenant.
        name -> Varchar,
        /// Argon2id hash of the tenant secret, PHC string format.
        secret_hash -> Varchar,
    }
}

diesel::table! {
    /// Users table.
    ///
    /// Every user belongs to exactly one client; `client_id` references
    /// `clients.id` and scopes all reads and writes.
    users (id) {
        /// Primary key: store-assigned identifier.
        id -> BigInt,
        /// Owning client tenant.
        client_id -> BigInt,
        /// Login name of the user.
        username -> Varchar,
        /// Contact email of the user.
        email -> Varchar,
        /// Argon2id hash of the user password, PHC string format.
        password_hash -> Varchar,
    }
}

diesel::joinable!(users -> clients (client_id));

diesel::allow_tables_to_appear_in_same_query!(clients, users);
