//! Login and logout handlers establishing the client session.
//!
//! ```text
//! POST /login {"name":"admin","secret":"password"}
//! POST /logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ClientDirectoryError;
use crate::domain::{ClientCredentials, ClientCredentialsValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /login`.
///
/// Example JSON:
/// `{"name":"admin","secret":"password"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Client login name.
    #[serde(default)]
    pub name: String,
    /// Client secret.
    #[serde(default)]
    pub secret: String,
}

fn map_credentials_validation_error(err: ClientCredentialsValidationError) -> Error {
    match err {
        ClientCredentialsValidationError::EmptyName => {
            Error::invalid_request("client name must not be empty")
                .with_details(json!({ "field": "name", "code": "empty_name" }))
        }
        ClientCredentialsValidationError::EmptySecret => {
            Error::invalid_request("client secret must not be empty")
                .with_details(json!({ "field": "secret", "code": "empty_secret" }))
        }
    }
}

fn map_directory_error(err: ClientDirectoryError) -> Error {
    match err {
        ClientDirectoryError::Connection { message } => Error::service_unavailable(message),
        ClientDirectoryError::Query { message } => Error::internal(message),
    }
}

/// Authenticate a client and establish a session.
///
/// Unknown names and wrong secrets produce the same response so the
/// endpoint cannot be used to probe which clients exist.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = ClientCredentials::try_from_parts(&payload.name, &payload.secret)
        .map_err(map_credentials_validation_error)?;

    let client = state
        .clients
        .find_by_name(credentials.name())
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

    let verified = state
        .hasher
        .verify(credentials.secret(), client.secret_hash())
        .await
        .map_err(|error| Error::internal(error.to_string()))?;
    if !verified {
        return Err(Error::unauthorized("invalid credentials"));
    }

    session.persist_client(client.id())?;
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
