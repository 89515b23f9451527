//! DevConnect application composition root
//!
//! Builds the document store, the session authorizer, and the router with
//! its shared middleware.

use anyhow::Context;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use devconnect_auth::{AuthConfig, SessionAuthorizer};
use devconnect_common::{
    ApplicationUniqueness, Config, LogFormat, StoreBackend, DEFAULT_LOG_FILTER,
};
use devconnect_jobs::{InMemoryJobStore, JobStore, JobsGateway, JobsState, PgJobStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Text served by the liveness route
pub const LIVENESS_TEXT: &str = "Dev Connect BD is running";

/// Parse a log filter, falling back to the default filter on bad input
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &Config) {
    let filter = env_filter(&config.rust_log);

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }
}

/// Build the configured document store.
///
/// The Postgres pool connects lazily. Migrations and the startup ping run in
/// the background and only log failures, so the listener comes up even when
/// the database is unreachable. In store-enforced uniqueness mode,
/// application writes fail until the unique index is installed.
pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn JobStore>> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory job store; data is lost on restart");
            Ok(Arc::new(InMemoryJobStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;

            let pool = PgPoolOptions::new()
                .connect_lazy(url)
                .context("Invalid database URL")?;
            let store = PgJobStore::new(pool);

            tokio::spawn(prepare_store(
                store.clone(),
                config.application_uniqueness,
            ));

            Ok(Arc::new(store))
        }
    }
}

async fn prepare_store(store: PgJobStore, uniqueness: ApplicationUniqueness) {
    if let Err(e) = store.migrate().await {
        tracing::error!(error = %e, "Failed to prepare document store");
        return;
    }

    if uniqueness == ApplicationUniqueness::StoreEnforced {
        if let Err(e) = store.ensure_unique_applications().await {
            tracing::error!(
                error = %e,
                "Failed to install unique application index; application writes will fail"
            );
        }
    }

    match store.ping().await {
        Ok(()) => tracing::info!("Pinged document store; connection established"),
        Err(e) => tracing::error!(error = %e, "Document store ping failed"),
    }
}

/// Build the CORS layer for credentialed requests from the frontend origin
pub fn build_cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("Invalid CORS origin: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config, store: Arc<dyn JobStore>) -> anyhow::Result<Router> {
    let auth = SessionAuthorizer::new(AuthConfig::new(config.access_token_secret.clone()));
    let gateway = JobsGateway::new(store, config.application_uniqueness);

    let jobs_state = JobsState { gateway, auth };

    let app = Router::new()
        .route("/", get(|| async { LIVENESS_TEXT }))
        .route("/health", get(health_check))
        .merge(devconnect_jobs::routes().with_state(jobs_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(build_cors_layer(&config.cors_origin)?)
                .into_inner(),
        );

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
