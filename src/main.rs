//! FeelBetter - mood-aware supportive chat companion
//!
//! A Rust backend that classifies the mood of each message, relays it to a
//! language model, and tracks a daily check-in.

mod api;
mod check_in;
mod config;
mod db;
mod gateway;
mod mood;
mod runtime;
mod session;
mod state_machine;
mod voice;

use api::{create_router, AppState};
use config::{BackendConfig, Config};
use db::Database;
use gateway::{BackendGateway, GatewayError, LoggingGateway, OpenAiGateway, RelayGateway};
use runtime::{spawn_session, DatabaseDateStore, SystemClock};
use state_machine::ConvContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice::SilentVoice;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feelbetter=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let backend = build_gateway(&config.backend)?;
    let upstream = build_gateway(&config.upstream)?;
    tracing::info!(
        backend = backend.name(),
        voice_output = config.voice_output,
        "Session backend configured"
    );

    let session = spawn_session(
        ConvContext::new(uuid::Uuid::new_v4().to_string(), config.voice_output),
        backend,
        DatabaseDateStore::new(db),
        Arc::new(SilentVoice),
        Arc::new(SystemClock),
    );

    let state = AppState::new(session, upstream, config.resource_preview);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("FeelBetter server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the logged gateway for a backend setting
fn build_gateway(config: &BackendConfig) -> Result<Arc<dyn BackendGateway>, GatewayError> {
    let inner: Arc<dyn BackendGateway> = match config {
        BackendConfig::OpenAi {
            api_key,
            model,
            base_url,
        } => {
            if api_key.is_none() {
                tracing::warn!("No OPENAI_API_KEY configured. Replies will fail until one is set.");
            }
            Arc::new(OpenAiGateway::new(
                api_key.clone().unwrap_or_default(),
                model.clone(),
                Some(base_url.as_str()),
            )?)
        }
        BackendConfig::Relay { url } => Arc::new(RelayGateway::new(url)?),
    };
    Ok(Arc::new(LoggingGateway::new(inner)))
}
