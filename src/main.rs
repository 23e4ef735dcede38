mod api;
mod chat;
mod config;
mod error;
mod fetcher;
mod mars;
mod neo;
mod scorer;
mod types;

use std::sync::Arc;

use tokio::signal::{self, ctrl_c};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::UpstreamLatency;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::NasaClient;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let latency = Arc::new(UpstreamLatency::new());
    let client = NasaClient::new(&cfg, Arc::clone(&latency))?;

    if cfg.nasa_api_key == config::DEFAULT_API_KEY {
        info!("NASA_API_KEY not set, using the rate-limited {} key", config::DEFAULT_API_KEY);
    }

    let api_state = ApiState {
        client: Arc::new(client),
        latency,
        health: Arc::new(HealthState::new(&cfg)),
    };
    let app = router(api_state);

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        environment = %cfg.environment,
        nasa = %cfg.nasa_api_url,
        eonet = %cfg.eonet_api_url,
        "HTTP API listening on {bind_addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
