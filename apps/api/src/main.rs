mod config;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod preview;
mod routes;
mod state;
mod tailoring;
mod vocabulary;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::policy::RewritePolicy;
use crate::vocabulary::Vocabulary;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = Vocabulary::load(config.vocabulary_path.as_deref())?;

    // LLM rewrites only when ANTHROPIC_API_KEY is set
    let rewrite_policy = RewritePolicy::from_config(&config)?;

    info!(
        "Uploads limited to {} MB, job descriptions need at least {} words",
        config.max_upload_mb, config.min_job_description_words
    );

    let state = AppState {
        config: config.clone(),
        vocabulary: Arc::new(vocabulary),
        rewrite_policy: Arc::new(rewrite_policy),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
