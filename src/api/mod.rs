//! HTTP layer - axum router, handlers and middleware.
//!
//! Handlers are thin: they decode the request, call one service method and
//! encode the result. Every failure is an [`Error`] rendered as
//! `{"error": "..."}` with the matching status code.

/// Registration and login endpoints
pub mod auth;
/// Cross-origin allow-list
pub mod cors;
/// Optional bearer-token gate for admin routes
pub mod guard;
/// Liveness endpoints
pub mod health;
/// Public and admin lixi endpoints
pub mod lixi;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    middleware,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::AppConfig,
    core::{
        auth::{AuthService, TOKEN_TTL_HOURS, TokenIssuer},
        greeting::GreetingLog,
        lixi::LixiService,
    },
    errors::{Error, Result},
    repository::{SeaGreetingRepository, SeaLixiRepository, SeaUserRepository},
};

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration service
    pub lixi: LixiService,
    /// Greeting log
    pub greetings: GreetingLog,
    /// Registration, login and token checks
    pub auth: AuthService,
}

impl AppState {
    /// Wires the SeaORM repositories over one connection pool.
    #[must_use]
    pub fn from_database(db: &DatabaseConnection, jwt_secret: &str) -> Self {
        Self {
            lixi: LixiService::new(Arc::new(SeaLixiRepository::new(db.clone()))),
            greetings: GreetingLog::new(Arc::new(SeaGreetingRepository::new(db.clone()))),
            auth: AuthService::new(
                Arc::new(SeaUserRepository::new(db.clone())),
                TokenIssuer::new(jwt_secret, chrono::Duration::hours(TOKEN_TTL_HOURS)),
            ),
        }
    }
}

/// Router-level options taken from [`AppConfig`].
#[derive(Clone, Debug)]
pub struct RouterOptions {
    /// Origins admitted by CORS
    pub allowed_origins: Vec<String>,
    /// Deadline applied to every request
    pub request_timeout: Duration,
    /// Require a bearer token on `/api/admin/*`
    pub admin_auth_required: bool,
}

impl From<&AppConfig> for RouterOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            request_timeout: config.request_timeout,
            admin_auth_required: config.admin_auth_required,
        }
    }
}

/// Builds the complete application router.
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let public = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/api/lixi/active", get(lixi::get_active))
        .route("/api/lixi/greeting", post(lixi::submit_greeting));

    let mut admin = Router::new()
        .route("/api/admin/lixi", get(lixi::list_configs).post(lixi::create_config))
        .route("/api/admin/lixi/greetings", get(lixi::list_greetings))
        .route(
            "/api/admin/lixi/{id}",
            put(lixi::update_config).delete(lixi::delete_config),
        )
        .route("/api/admin/lixi/{id}/activate", post(lixi::activate_config));

    if options.admin_auth_required {
        admin = admin.route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_bearer,
        ));
    }

    public
        .merge(admin)
        .with_state(state)
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors::cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Serves `router` on `port` until Ctrl-C.
pub async fn serve(router: Router, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server is running on http://localhost:{port}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Unwraps a JSON body, answering malformed input with a 400.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| Error::validation("Invalid request body"))
}

/// Parses a path id. Anything that is not an integer cannot name a row.
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| Error::NotFound {
        entity: "lixi config",
    })
}
