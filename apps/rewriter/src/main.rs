mod articles;
mod config;
mod errors;
mod llm_client;
mod rewrite;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::articles::HttpArticleFetcher;
use crate::config::Config;
use crate::llm_client::{CompletionClient, OpenAiBackend};
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

    info!("Starting Article Rewriter v{}", env!("CARGO_PKG_VERSION"));

    // Initialize article fetcher
    let fetcher = HttpArticleFetcher::new(config.fetch_timeout)?;
    info!("Article fetcher initialized (timeout: {:?})", config.fetch_timeout);

    // Initialize LLM client
    let backend = OpenAiBackend::from_config(&config)?;
    info!(
        "LLM client initialized (model: {}, attempts: {}, backoff: {:?})",
        backend.model(),
        config.completion_max_attempts,
        config.rate_limit_backoff
    );
    let llm = CompletionClient::new(
        Arc::new(backend),
        config.completion_max_attempts,
        config.rate_limit_backoff,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        fetcher: Arc::new(fetcher),
        llm,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
