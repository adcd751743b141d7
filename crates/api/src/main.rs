//! Server binary: wire up the database, the event pipeline, and the
//! router, then serve until told to stop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealflow_api::config::ServerConfig;
use dealflow_api::router::build_app_router;
use dealflow_api::state::AppState;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = dealflow_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    dealflow_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    dealflow_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    // --- Event pipeline ---
    // Engines publish on the bus; the persistence task owns a
    // subscription and writes the audit trail.
    let event_bus = Arc::new(dealflow_events::EventBus::default());
    let persistence_handle = tokio::spawn(dealflow_events::EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Event bus and persistence task running");

    // --- Router ---
    let state = AppState::new(pool, Arc::new(config.clone()), Arc::clone(&event_bus));
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Drain ---
    // The router (and with it the engines' bus handles) is gone once
    // serve returns; dropping our handle closes the channel, and the
    // persistence task drains whatever is still buffered before exiting.
    tracing::info!("No longer accepting connections, draining events");
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    tracing::info!("Shutdown complete");
}

/// Resolve when the process is asked to stop.
///
/// Listens for SIGINT (Ctrl-C) and, on Unix, SIGTERM, so both an
/// interactive stop and a process manager's stop request drain cleanly.
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

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Termination signal received, shutting down");
}
