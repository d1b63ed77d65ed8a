//! `/users` resource handlers.
//!
//! ```text
//! GET    /users?page=&limit=
//! GET    /users/{userId}
//! POST   /users
//! PUT    /users/{userId}
//! DELETE /users/{userId}
//! ```
//!
//! Every endpoint requires an authenticated client session; the session's
//! client id scopes all reads and writes, so one tenant can neither see nor
//! mutate another tenant's users.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::directory::NO_SUCH_USER;
use crate::domain::{Error, UserDraft, UserDraftValidationError, UserId, UserView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use pagination::{PageRequest, PaginationError};

/// Pagination query parameters accepted by the list endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// One-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Items per page; defaults to 2.
    pub limit: Option<u32>,
}

/// Create/update request body; all fields are required and non-blank.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// Login name of the user.
    #[serde(default)]
    pub username: String,
    /// Plaintext password; hashed before persistence and never echoed back.
    #[serde(default)]
    pub password: String,
    /// Contact email of the user.
    #[serde(default)]
    pub email: String,
}

impl UserPayload {
    fn into_draft(self) -> Result<UserDraft, UserDraftValidationError> {
        UserDraft::try_from_parts(&self.username, &self.password, &self.email)
    }
}

fn map_draft_validation_error(err: &UserDraftValidationError) -> Error {
    let fields: Vec<&str> = err.violations().iter().map(|field| field.as_str()).collect();
    Error::invalid_request(err.to_string())
        .with_details(json!({ "fields": fields, "code": "blank_field" }))
}

fn map_pagination_error(err: &PaginationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "code": "invalid_page" }))
}

fn parse_user_id(raw: i64) -> Result<UserId, Error> {
    // Zero and negative ids cannot name a stored user.
    UserId::new(raw).map_err(|_| Error::not_found(NO_SUCH_USER))
}

/// List the authenticated client's users, one cached page at a time.
#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Paginated user views", body = serde_json::Value),
        (status = 400, description = "Invalid pagination", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<HttpResponse> {
    let client_id = session.require_client()?;
    let request = PageRequest::from_optional(query.page, query.limit)
        .map_err(|err| map_pagination_error(&err))?;
    let envelope = state.directory.list_users(client_id, request).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// Fetch one of the authenticated client's users.
#[utoipa::path(
    get,
    path = "/users/{userId}",
    params(("userId" = i64, Path, description = "Store-assigned user id")),
    responses(
        (status = 200, description = "User view", body = UserView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown or foreign user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{userId}")]
pub async fn get_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let client_id = session.require_client()?;
    let user_id = parse_user_id(path.into_inner())?;
    let view = state.directory.get_user(client_id, user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Create a user owned by the authenticated client.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Created user view", body = UserView),
        (status = 400, description = "Blank required fields", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let client_id = session.require_client()?;
    let draft = payload
        .into_inner()
        .into_draft()
        .map_err(|err| map_draft_validation_error(&err))?;
    let view = state.directory.create_user(client_id, draft).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Replace every mutable field of one of the authenticated client's users.
#[utoipa::path(
    put,
    path = "/users/{userId}",
    params(("userId" = i64, Path, description = "Store-assigned user id")),
    request_body = UserPayload,
    responses(
        (status = 202, description = "Updated user view", body = UserView),
        (status = 400, description = "Blank required fields", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown or foreign user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{userId}")]
pub async fn update_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let client_id = session.require_client()?;
    let user_id = parse_user_id(path.into_inner())?;
    let draft = payload
        .into_inner()
        .into_draft()
        .map_err(|err| map_draft_validation_error(&err))?;
    let view = state
        .directory
        .update_user(client_id, user_id, draft)
        .await?;
    Ok(HttpResponse::Accepted().json(view))
}

/// Delete one of the authenticated client's users.
#[utoipa::path(
    delete,
    path = "/users/{userId}",
    params(("userId" = i64, Path, description = "Store-assigned user id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown or foreign user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{userId}")]
pub async fn delete_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let client_id = session.require_client()?;
    let user_id = parse_user_id(path.into_inner())?;
    state.directory.delete_user(client_id, user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! End-to-end handler coverage over in-memory adapters.
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, test_app, test_state};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &Cookie<'static>,
        username: &str,
        email: &str,
    ) -> Value {
        let request = actix_test::TestRequest::post()
            .uri("/users")
            .cookie(cookie.clone())
            .set_json(&UserPayload {
                username: username.into(),
                password: "secret".into(),
                email: email.into(),
            })
            .to_request();
        let response = actix_test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("created view")
    }

    #[actix_web::test]
    async fn endpoints_reject_anonymous_requests() {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;

        for request in [
            actix_test::TestRequest::get().uri("/users").to_request(),
            actix_test::TestRequest::get().uri("/users/1").to_request(),
            actix_test::TestRequest::delete().uri("/users/1").to_request(),
        ] {
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn create_round_trip_never_exposes_password() {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        let created = create(&app, &cookie, "alice", "a@x.com").await;
        let id = created.get("id").and_then(Value::as_i64).expect("id");
        assert_eq!(created.get("username").and_then(Value::as_str), Some("alice"));
        assert_eq!(created.get("email").and_then(Value::as_str), Some("a@x.com"));
        assert!(created.get("password").is_none());
        assert!(created.get("passwordHash").is_none());

        let request = actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .cookie(cookie.clone())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let fetched: Value = serde_json::from_slice(&body).expect("user view");
        assert_eq!(fetched, created);

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .cookie(cookie.clone())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("", "secret", "a@x.com", vec!["username"])]
    #[case("alice", "", "a@x.com", vec!["password"])]
    #[case("alice", "secret", "", vec!["email"])]
    #[case("", "", "", vec!["username", "password", "email"])]
    #[actix_web::test]
    async fn create_with_blank_fields_is_rejected_with_details(
        #[case] username: &str,
        #[case] password: &str,
        #[case] email: &str,
        #[case] expected_fields: Vec<&str>,
    ) {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        let request = actix_test::TestRequest::post()
            .uri("/users")
            .cookie(cookie.clone())
            .set_json(&UserPayload {
                username: username.into(),
                password: password.into(),
                email: email.into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        let fields: Vec<&str> = value
            .get("details")
            .and_then(|details| details.get("fields"))
            .and_then(Value::as_array)
            .expect("violated fields listed")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(fields, expected_fields);

        // Validation failures must not create users.
        let request = actix_test::TestRequest::get()
            .uri("/users")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body = actix_test::read_body(response).await;
        let listed: Value = serde_json::from_slice(&body).expect("page envelope");
        assert_eq!(listed.get("totalItems").and_then(Value::as_u64), Some(0));
    }

    #[actix_web::test]
    async fn list_pages_with_default_size_and_reflects_writes() {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        for (username, email) in [
            ("alice", "a@x.com"),
            ("bob", "b@x.com"),
            ("carol", "c@x.com"),
        ] {
            create(&app, &cookie, username, email).await;
        }

        let request = actix_test::TestRequest::get()
            .uri("/users?page=2")
            .cookie(cookie.clone())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let page: Value = serde_json::from_slice(&body).expect("page envelope");
        assert_eq!(page.get("page").and_then(Value::as_u64), Some(2));
        assert_eq!(page.get("pageSize").and_then(Value::as_u64), Some(2));
        assert_eq!(page.get("totalItems").and_then(Value::as_u64), Some(3));
        assert_eq!(page.get("totalPages").and_then(Value::as_u64), Some(2));
        let items = page.get("items").and_then(Value::as_array).expect("items");
        assert_eq!(items.len(), 1);

        // A delete must be visible to the very next list read.
        let id = items
            .first()
            .and_then(|item| item.get("id"))
            .and_then(Value::as_i64)
            .expect("listed id");
        let request = actix_test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .cookie(cookie.clone())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = actix_test::TestRequest::get()
            .uri("/users")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body = actix_test::read_body(response).await;
        let page: Value = serde_json::from_slice(&body).expect("page envelope");
        assert_eq!(page.get("totalItems").and_then(Value::as_u64), Some(2));
    }

    #[actix_web::test]
    async fn update_replaces_all_fields_and_invalidates_the_cached_detail() {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        let created = create(&app, &cookie, "alice", "a@x.com").await;
        let id = created.get("id").and_then(Value::as_i64).expect("id");

        // Prime the detail cache.
        let request = actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .cookie(cookie.clone())
            .to_request();
        actix_test::call_service(&app, request).await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .cookie(cookie.clone())
            .set_json(&UserPayload {
                username: "alice2".into(),
                password: "new-secret".into(),
                email: "a2@x.com".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let request = actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body = actix_test::read_body(response).await;
        let fetched: Value = serde_json::from_slice(&body).expect("user view");
        assert_eq!(fetched.get("username").and_then(Value::as_str), Some("alice2"));
        assert_eq!(fetched.get("email").and_then(Value::as_str), Some("a2@x.com"));
    }

    #[rstest]
    #[case("/users/999")]
    #[case("/users/0")]
    #[case("/users/-4")]
    #[actix_web::test]
    async fn get_unknown_users_is_not_found(#[case] uri: &str) {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some(NO_SUCH_USER)
        );
    }

    #[actix_web::test]
    async fn invalid_pagination_is_a_bad_request() {
        let state = test_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/users?page=0")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
