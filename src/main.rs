//! Feedback Console Backend
//!
//! Admin console for customer feedback: session handling against the feedback
//! API's token endpoint, per-screen data loading, chart shaping and report exports.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod export;
mod gateway;
mod loader;
mod models;
mod session;
mod shape;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::ClientStorage;
use gateway::FeedbackGateway;
use session::{SessionContext, SessionStore};
use views::Screens;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionContext,
    pub screens: Screens,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, session: SessionContext) -> Result<Self, errors::AppError> {
        let gateway = FeedbackGateway::new(&config, session.clone())?;
        Ok(Self {
            session,
            screens: Screens::new(gateway),
            config: Arc::new(config),
        })
    }

    pub fn gateway(&self) -> &FeedbackGateway {
        self.screens.gateway()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Feedback Console");
    tracing::info!("Feedback API: {}", config.api_base_url);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.attach_token {
        tracing::info!("Access token will be attached to resource requests");
    }

    // Initialize client storage and the session built on it
    let pool = db::init_database(&config.db_path).await?;
    let session = SessionContext::new(SessionStore::new(ClientStorage::new(pool)));

    if session.current_identity().await.is_some() {
        tracing::info!("Resuming stored session");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, session)?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Screens require a session
    let screen_routes = Router::new()
        .route("/dashboard", get(api::dashboard))
        .route("/feedback", get(api::feedback))
        .route("/analytic", get(api::analytic))
        .route("/analytic/refresh", post(api::refresh_analytic))
        .route("/analytic/export/{format}", get(api::export_report))
        .route("/faq", post(api::train_faq))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    // Login screen, logout and health check (no session required)
    let open_routes = Router::new()
        .route("/", get(api::session_status).post(api::login))
        .route("/logout", post(api::logout))
        .route("/health", get(health_check));

    Router::new()
        .merge(screen_routes)
        .merge(open_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod test_support;
