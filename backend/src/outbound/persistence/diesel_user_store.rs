//! PostgreSQL-backed [`UserStore`] implementation using Diesel.
//!
//! Every query filters on the owning client id, so a user owned by another
//! client is indistinguishable from a missing one at this layer already.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{NewUser, UserChanges, UserStore, UserStoreError};
use crate::domain::{ClientId, Email, PasswordHash, User, UserId, Username};

use super::models::{NewUserRow, UserRow, UserRowChanges};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserStore`] port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::non_unique("duplicate record")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserStoreError::query("database error"),
        _ => UserStoreError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Rows that violate domain validation indicate data corruption and map to
/// query errors rather than panics.
fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let id = UserId::new(row.id)
        .map_err(|error| UserStoreError::query(format!("stored user id is invalid: {error}")))?;
    let client_id = ClientId::new(row.client_id)
        .map_err(|error| UserStoreError::query(format!("stored client id is invalid: {error}")))?;
    let username = Username::new(row.username)
        .map_err(|error| UserStoreError::query(format!("stored username is invalid: {error}")))?;
    let email = Email::new(row.email)
        .map_err(|error| UserStoreError::query(format!("stored email is invalid: {error}")))?;
    Ok(User::new(
        id,
        client_id,
        username,
        email,
        PasswordHash::new(row.password_hash),
    ))
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn list_for_client(&self, client_id: ClientId) -> Result<Vec<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::client_id.eq(client_id.get()))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_for_client(
        &self,
        client_id: ClientId,
        user_id: UserId,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(user_id.get()))
            .filter(users::client_id.eq(client_id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow {
                client_id: new_user.client_id.get(),
                username: new_user.username.as_str(),
                email: new_user.email.as_str(),
                password_hash: new_user.password_hash.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn update(
        &self,
        client_id: ClientId,
        user_id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(
            users::table
                .filter(users::id.eq(user_id.get()))
                .filter(users::client_id.eq(client_id.get())),
        )
        .set(UserRowChanges {
            username: changes.username.as_str(),
            email: changes.email.as_str(),
            password_hash: changes.password_hash.as_str(),
        })
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, client_id: ClientId, user_id: UserId) -> Result<bool, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            users::table
                .filter(users::id.eq(user_id.get()))
                .filter(users::client_id.eq(client_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
