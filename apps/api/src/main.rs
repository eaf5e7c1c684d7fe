use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::Config;
use api::llm_client::{self, GeminiClient};
use api::routes::build_router;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume pipeline API v{}", env!("CARGO_PKG_VERSION"));

    // Ensure the two persistence directories exist before serving
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.vector_dir).await?;
    info!(
        "Upload dir: {} | vector dir: {}",
        config.upload_dir.display(),
        config.vector_dir.display()
    );

    // Initialize the Gemini client
    let llm = GeminiClient::new(config.google_api_key.clone());
    info!(
        "Gemini client initialized (completion: {}, embeddings: {})",
        llm_client::COMPLETION_MODEL,
        llm_client::EMBEDDING_MODEL
    );

    // Build app state and router
    let state = AppState::new(llm, config.clone());
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
