mod classifier;
mod config;
mod errors;
mod jobs;
mod models;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::classifier::EmbeddingClassifier;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::JobStore;

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

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    // A single unreadable listing stops startup.
    let store = JobStore::load(&config.data_dir).with_context(|| {
        format!(
            "Failed to load job listings from {}",
            config.data_dir.display()
        )
    })?;

    // Models load lazily on the first prediction.
    let classifier = Arc::new(EmbeddingClassifier::new(
        &config.embedding_model_path,
        &config.classifier_model_path,
    ));
    info!(
        "Category classifier configured (embeddings: {}, classifier: {})",
        config.embedding_model_path.display(),
        config.classifier_model_path.display()
    );

    let state = AppState::new(store, classifier);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
