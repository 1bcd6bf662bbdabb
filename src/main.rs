//! Campus Cache - session-scoped caching and scheduling server
//!
//! Serves paged university data out of TTL caches and guards the lecture
//! schedule against teacher double-booking.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_cache::api::create_router;
use campus_cache::domain::UniversityData;
use campus_cache::{AppState, CampusService, Config};

/// Main entry point for the campus cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Seed the university from `SEED_FILE` when set
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Campus Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: page_ttl={}s, lecture_page_ttl={}s, items_per_page={}, tracker_capacity={}, session_capacity={}, session_idle_ttl={}s, port={}",
        config.page_ttl,
        config.lecture_page_ttl,
        config.items_per_page,
        config.tracker_capacity,
        config.session_capacity,
        config.session_idle_ttl,
        config.server_port
    );

    let data = load_seed(&config)?;
    let state = AppState::new(CampusService::from_data(config.clone(), data));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Reads seed data from the configured file, or starts empty.
fn load_seed(config: &Config) -> anyhow::Result<UniversityData> {
    let Some(path) = &config.seed_file else {
        return Ok(UniversityData::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path))?;
    let data: UniversityData = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path))?;

    info!(
        "Seed data loaded from {}: {} teachers, {} students, {} courses, {} lectures",
        path,
        data.teachers.len(),
        data.students.len(),
        data.courses.len(),
        data.lectures.len()
    );
    Ok(data)
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
