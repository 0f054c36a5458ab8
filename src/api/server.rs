//! HTTP API server

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{guard_routes, resolve_session};
use crate::auth::models::User;
use crate::auth::session::SessionManager;
use crate::auth::token::TokenStore;
use crate::config::Config;
use crate::error::Result;
use crate::mail::Mailer;
use crate::store::{CategoryStore, UserStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub users: UserStore,
    pub tokens: TokenStore,
    pub categories: CategoryStore,
    pub mailer: Mailer,
}

pub type SharedState = Arc<RwLock<AppState>>;

/// Build shared state, seeding the bootstrap admin account if configured
pub async fn build_state(config: Config) -> Result<SharedState> {
    let sessions = SessionManager::new(&config.session);
    let users = UserStore::new();
    let base_url = format!("http://{}:{}", config.server.host, config.server.port);
    let mailer = Mailer::new(base_url);

    if let Some(admin) = &config.admin {
        if users.find_by_email(&admin.email).await.is_none() {
            let hash = bcrypt::hash(&admin.password, bcrypt::DEFAULT_COST)?;
            let mut user = User::new(admin.username.clone(), admin.email.clone(), hash);
            user.admin = true;
            user.email_verified = true;
            users.insert(user).await?;
            tracing::info!(email = %admin.email, "seeded bootstrap admin account");
        }
    }

    Ok(Arc::new(RwLock::new(AppState {
        config,
        sessions,
        users,
        tokens: TokenStore::new(),
        categories: CategoryStore::new(),
        mailer,
    })))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config).await?;

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Auth API
        .route("/api/health", get(routes::health))
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/auth/me", get(routes::me))
        .route("/api/auth/verify-email", post(routes::verify_email))
        .route(
            "/api/auth/password-reset/request",
            post(routes::request_password_reset),
        )
        .route(
            "/api/auth/password-reset/confirm",
            post(routes::confirm_password_reset),
        )
        .route("/api/auth/change-password", post(routes::change_password))
        // Page stubs for the rendered flows
        .route("/login", get(routes::login_page))
        .route("/account/change-password", get(routes::change_password_page))
        // Admin category management
        .route("/admin/categories", get(routes::list_categories))
        .route("/admin/categories", post(routes::create_category))
        .route("/admin/categories/{id}", delete(routes::delete_category))
        .fallback(routes::not_found)
        // Middleware: the last layer added is outermost, so session
        // resolution runs before the guard
        .layer(middleware::from_fn(guard_routes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
