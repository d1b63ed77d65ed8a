//! User aggregate, its validated field types, and the outward projection.
//!
//! A `User` always belongs to exactly one [`Client`](super::client::Client);
//! every read and write of a user is scoped to its owning client. The
//! password is only ever held as an irreversible hash — the aggregate has no
//! way to carry a plaintext, and the [`UserView`] projection has no way to
//! carry the hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::client::ClientId;

/// Validation errors raised when constructing user field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifiers are store-assigned positive integers.
    NonPositiveId,
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a user identifier.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if value < 1 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(value))
    }

    /// The raw identifier value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name of a user, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email of a user, trimmed and non-empty.
///
/// Format validation is deliberately out of scope; the store treats the
/// value as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an email value.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the email as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One-way hash of a user or client secret, in PHC string format.
///
/// Never serialised; the `Debug` impl redacts the content so hashes cannot
/// leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed PHC hash string.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Borrow the PHC hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A user record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    client_id: ClientId,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(
        id: UserId,
        client_id: ClientId,
        username: Username,
        email: Email,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            client_id,
            username,
            email,
            password_hash,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Owning client; immutable after creation.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored secret hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Field names reported by [`UserDraft`] validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    /// The `username` payload field.
    Username,
    /// The `password` payload field.
    Password,
    /// The `email` payload field.
    Email,
}

impl DraftField {
    /// Wire name of the field, matching the request payload.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure listing every blank field in a create/update payload.
///
/// Create and full-replacement update share one validation contract, and
/// callers are told about all violations at once rather than the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraftValidationError {
    violations: Vec<DraftField>,
}

impl UserDraftValidationError {
    /// Fields that failed validation, in payload order.
    #[must_use]
    pub fn violations(&self) -> &[DraftField] {
        &self.violations
    }
}

impl fmt::Display for UserDraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.violations.iter().map(|f| f.as_str()).collect();
        write!(f, "fields must not be blank: {}", fields.join(", "))
    }
}

impl std::error::Error for UserDraftValidationError {}

/// Validated create/update payload carrying the plaintext password.
///
/// The plaintext only lives long enough to be hashed; it is wrapped in
/// [`Zeroizing`] so the buffer is wiped on drop, and there is no accessor
/// that clones it.
#[derive(Debug, Clone)]
pub struct UserDraft {
    username: Username,
    password: Zeroizing<String>,
    email: Email,
}

impl UserDraft {
    /// Validate raw payload strings into a draft, reporting every blank
    /// field.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Self, UserDraftValidationError> {
        let mut violations = Vec::new();

        let username = Username::new(username).map_err(|_| violations.push(DraftField::Username));
        if password.is_empty() {
            violations.push(DraftField::Password);
        }
        let email = Email::new(email).map_err(|_| violations.push(DraftField::Email));

        match (username, email, violations.is_empty()) {
            (Ok(username), Ok(email), true) => Ok(Self {
                username,
                password: Zeroizing::new(password.to_owned()),
                email,
            }),
            _ => {
                violations.sort_by_key(|field| match field {
                    DraftField::Username => 0_u8,
                    DraftField::Password => 1,
                    DraftField::Email => 2,
                });
                Err(UserDraftValidationError { violations })
            }
        }
    }

    /// Validated username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Validated email.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Outward projection of a user: identity and contact fields only.
///
/// This is the only user shape that crosses the HTTP boundary or enters the
/// response cache. It cannot represent a password or hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Store-assigned identifier.
    #[schema(example = 42)]
    pub id: i64,
    /// Login name.
    #[schema(example = "alice")]
    pub username: String,
    /// Contact email.
    #[schema(example = "alice@example.com")]
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
        }
    }
}
