//! PostgreSQL-backed [`ClientDirectory`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ClientDirectory, ClientDirectoryError};
use crate::domain::{Client, ClientId, PasswordHash};

use super::models::ClientRow;
use super::pool::{DbPool, PoolError};
use super::schema::clients;

/// Diesel-backed implementation of the [`ClientDirectory`] port.
#[derive(Clone)]
pub struct DieselClientDirectory {
    pool: DbPool,
}

impl DieselClientDirectory {
    /// Create a new directory with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClientDirectoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ClientDirectoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ClientDirectoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ClientDirectoryError::connection("database connection error")
        }
        _ => ClientDirectoryError::query("database error"),
    }
}

fn row_to_client(row: ClientRow) -> Result<Client, ClientDirectoryError> {
    let id = ClientId::new(row.id).map_err(|error| {
        ClientDirectoryError::query(format!("stored client id is invalid: {error}"))
    })?;
    Ok(Client::new(id, row.name, PasswordHash::new(row.secret_hash)))
}

#[async_trait]
impl ClientDirectory for DieselClientDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ClientRow> = clients::table
            .filter(clients::name.eq(name))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_client).transpose()
    }
}
