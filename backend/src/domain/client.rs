//! Client tenant primitives and login credentials.
//!
//! Clients are the authenticated principals of the service: every session
//! resolves to exactly one client, and every user belongs to exactly one
//! client. Keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before a handler talks to a
//! port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::user::PasswordHash;

/// Validation errors for client primitives and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCredentialsValidationError {
    /// Client name was missing or blank once trimmed.
    EmptyName,
    /// Secret was blank.
    EmptySecret,
}

impl fmt::Display for ClientCredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "client name must not be empty"),
            Self::EmptySecret => write!(f, "client secret must not be empty"),
        }
    }
}

impl std::error::Error for ClientCredentialsValidationError {}

/// Validation error raised for non-positive client identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdValidationError;

impl fmt::Display for ClientIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client id must be a positive integer")
    }
}

impl std::error::Error for ClientIdValidationError {}

/// Store-assigned client identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ClientId(i64);

impl ClientId {
    /// Validate and construct a client identifier.
    pub fn new(value: i64) -> Result<Self, ClientIdValidationError> {
        if value < 1 {
            return Err(ClientIdValidationError);
        }
        Ok(Self(value))
    }

    /// The raw identifier value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<ClientId> for i64 {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for ClientId {
    type Error = ClientIdValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A client tenant as held by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id: ClientId,
    name: String,
    secret_hash: PasswordHash,
}

impl Client {
    /// Assemble a client from validated parts.
    #[must_use]
    pub fn new(id: ClientId, name: String, secret_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            secret_hash,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Unique login name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Stored secret hash.
    #[must_use]
    pub fn secret_hash(&self) -> &PasswordHash {
        &self.secret_hash
    }
}

/// Validated client login credentials.
///
/// ## Invariants
/// - `name` is trimmed and must not be empty after trimming.
/// - `secret` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    name: String,
    secret: Zeroizing<String>,
}

impl ClientCredentials {
    /// Construct credentials from raw name/secret inputs.
    pub fn try_from_parts(
        name: &str,
        secret: &str,
    ) -> Result<Self, ClientCredentialsValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(ClientCredentialsValidationError::EmptyName);
        }

        if secret.is_empty() {
            return Err(ClientCredentialsValidationError::EmptySecret);
        }

        Ok(Self {
            name: normalized.to_owned(),
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Client name suitable for directory lookups.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Secret string provided by the caller.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}
