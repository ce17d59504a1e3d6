use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use maintdesk_db::{MemoryTicketStore, PgTicketStore, TicketStore};
use maintdesk_events::HttpPushSender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maintdesk_api::config::ServerConfig;
use maintdesk_api::router::build_app_router;
use maintdesk_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "maintdesk_api=debug,maintdesk_events=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        hq_location = %config.hq_location,
        "Loaded server configuration"
    );

    // --- Ticket store ---
    let store = connect_store().await;

    // --- Push delivery ---
    let sender = HttpPushSender::new(Duration::from_secs(config.push.timeout_secs))
        .expect("Failed to build push HTTP client");
    if config.push.public_key.is_empty() {
        tracing::warn!("PUSH_PUBLIC_KEY is not set; clients cannot subscribe to push");
    }

    // --- App state and router ---
    let state = AppState::new(store, config.clone(), Arc::new(sender));
    let dispatcher = Arc::clone(&state.dispatcher);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!(
        in_flight = dispatcher.in_flight(),
        "Server stopped accepting connections, draining notifications"
    );
    let drained = dispatcher
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;

    tracing::info!(drained, "Graceful shutdown complete");
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store.
async fn connect_store() -> Arc<dyn TicketStore> {
    let Some(database_url) = std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
    else {
        tracing::warn!("DATABASE_URL is not set; using the in-memory ticket store");
        return Arc::new(MemoryTicketStore::new());
    };

    let pool = maintdesk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    maintdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    maintdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgTicketStore::new(pool))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
