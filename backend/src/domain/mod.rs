//! Domain primitives, ports, and the user-directory use-case core.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc. Nothing in this
//! module imports Actix, Diesel, or any other adapter technology.

pub mod client;
pub mod directory;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::client::{
    Client, ClientCredentials, ClientCredentialsValidationError, ClientId,
    ClientIdValidationError,
};
pub use self::directory::UserDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DraftField, Email, PasswordHash, User, UserDraft, UserDraftValidationError, UserId, UserView,
    UserValidationError, Username,
};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
