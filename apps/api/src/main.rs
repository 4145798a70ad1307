mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::orchestrator::{Orchestrator, MAX_REVIEW_ROUNDS, REVISION_THRESHOLD};
use crate::llm_client::LlmClient;
use crate::models::profile::MasterProfile;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // The server still starts without a profile; /api/v1/generate reports it.
    let profile = match MasterProfile::load(&config.profile_path).and_then(|p| p.to_record()) {
        Ok(record) => {
            info!("Master profile loaded from {}", config.profile_path);
            Some(Arc::new(record))
        }
        Err(e) => {
            warn!("Master profile unavailable: {e:#}");
            None
        }
    };

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let orchestrator = Orchestrator::new(Arc::new(llm)).with_best_tracking(config.best_tracking);
    info!(
        "Refinement pipeline ready: threshold {}, max {} review rounds, best tracking {:?}",
        REVISION_THRESHOLD,
        MAX_REVIEW_ROUNDS,
        orchestrator.best_tracking()
    );

    let state = AppState {
        orchestrator,
        profile,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser extension client; origin is not fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
