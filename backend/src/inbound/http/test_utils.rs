//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::PasswordHasher as _;
use crate::domain::{Client, ClientId, UserDirectoryService};
use crate::inbound::http::auth::{LoginRequest, login, logout};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::outbound::cache::InMemoryResponseCache;
use crate::outbound::persistence::{InMemoryClientDirectory, InMemoryUserStore};
use crate::outbound::security::Argon2PasswordHasher;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state backed by in-memory adapters, with one registered
/// client: name `admin`, secret `password`.
pub async fn test_state() -> HttpState {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let secret_hash = hasher.hash("password").await.expect("hash fixture secret");

    let clients = InMemoryClientDirectory::new();
    clients.register(Client::new(
        ClientId::new(1).expect("fixture client id"),
        "admin".to_owned(),
        secret_hash,
    ));

    let directory = UserDirectoryService::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryResponseCache::new()),
        hasher.clone(),
    );

    HttpState::new(directory, Arc::new(clients), hasher)
}

/// Build an application exposing the full HTTP surface over the supplied
/// state, with test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(login)
        .service(logout)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
}

/// Log in as the fixture client and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_web::test::TestRequest::post()
        .uri("/login")
        .set_json(&LoginRequest {
            name: "admin".into(),
            secret: "password".into(),
        })
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login must succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
