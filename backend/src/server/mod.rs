//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{ClientDirectory, UserStore};
use crate::domain::{Client, ClientId, UserDirectoryService};
use crate::inbound::http::auth::{login, logout};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::outbound::cache::InMemoryResponseCache;
use crate::outbound::persistence::{
    DieselClientDirectory, DieselUserStore, InMemoryClientDirectory, InMemoryUserStore,
};
use crate::outbound::security::Argon2PasswordHasher;

const FIXTURE_CLIENT_NAME: &str = "admin";
const FIXTURE_CLIENT_SECRET: &str = "password";

/// Build the shared HTTP state from configured ports.
///
/// Uses PostgreSQL-backed adapters when a pool is available; otherwise
/// falls back to in-memory adapters seeded with one fixture client so the
/// API is usable without a database.
fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let cache = Arc::new(InMemoryResponseCache::new());

    let (store, clients): (Arc<dyn UserStore>, Arc<dyn ClientDirectory>) = match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselUserStore::new(pool.clone())),
            Arc::new(DieselClientDirectory::new(pool.clone())),
        ),
        None => {
            let secret_hash = Argon2PasswordHasher::hash_blocking(FIXTURE_CLIENT_SECRET)
                .map_err(|err| {
                    std::io::Error::other(format!("failed to hash fixture client secret: {err}"))
                })?;
            let directory = InMemoryClientDirectory::new();
            directory.register(Client::new(
                ClientId::new(1).map_err(|err| {
                    std::io::Error::other(format!("invalid fixture client id: {err}"))
                })?,
                FIXTURE_CLIENT_NAME.to_owned(),
                secret_hash,
            ));
            info!(
                client = FIXTURE_CLIENT_NAME,
                "no database configured; using in-memory store with fixture client"
            );
            (Arc::new(InMemoryUserStore::new()), Arc::new(directory))
        }
    };

    let directory = UserDirectoryService::new(store, cache, hasher.clone());
    Ok(web::Data::new(HttpState::new(directory, clients, hasher)))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    // The session scope matches every remaining path, so it registers last.
    app.service(api)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when state construction or socket binding
/// fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
