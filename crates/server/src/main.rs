//! Smart Cart backend server.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - `PostgreSQL` via sqlx, or an in-memory store for demos
//! - Optional background sweeper for expired cash intents
//!
//! Migrations are NOT run on startup. Run them explicitly via:
//! `cargo run -p smart-cart-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smart_cart_server::config::{LogFormat, ServerConfig, StoreBackend};
use smart_cart_server::db::{self, MemoryStore, PgStore, Store};
use smart_cart_server::services::{RandomCodeGenerator, SystemClock, spawn_sweeper};
use smart_cart_server::{AppState, build_router, middleware};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with EnvFilter, the configured output format and
/// Sentry integration.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "smart_cart_server=info,tower_http=debug".into());

    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (
            None,
            Some(tracing_subscriber::fmt::layer().json().flatten_event(true)),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Open the configured store.
async fn open_store(config: &ServerConfig) -> Arc<dyn Store> {
    match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .expect("Postgres store configured without a database URL");
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let store = open_store(&config).await;
    let state = AppState::new(
        store,
        Arc::new(SystemClock),
        Arc::new(RandomCodeGenerator::default()),
    );

    if let Some(every) = config.sweep_interval {
        let _sweeper = spawn_sweeper(state.verification().clone(), every);
        tracing::info!(every_secs = every.as_secs(), "Cash intent sweeper started");
    }

    let app = build_router(state, middleware::cors_layer(&config.cors_origins))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("smart-cart-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
