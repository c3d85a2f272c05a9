use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use ytrelay_server::{AppState, ServerConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    setup_logging(&config);

    let cors = config.cors_layer()?;
    if config.allows_any_origin() {
        tracing::warn!("CORS allows any origin; set RELAY_ALLOWED_ORIGINS to restrict it");
    }

    let policy = config.search_policy();
    let state = AppState::new(&config.client_config(), policy)
        .context("initializing YouTube HTTP client")?;

    let app = router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    tracing::info!(
        api = %config.api_base_url,
        rank_by_comments = policy.rank_by_comments,
        skip_uncommented = policy.skip_uncommented,
        "ytrelay listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running HTTP server")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Sets up the tracing subscriber; `RUST_LOG` overrides the verbosity flags
fn setup_logging(config: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn shutdown_signal() {
    // Only graceful shutdown depends on this; Ctrl+C still stops the process
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
}
