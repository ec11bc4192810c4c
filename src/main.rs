use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use varco_tts_tester::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = config.listen_addr();

    tracing::info!("VARCO TTS tester v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Voice catalog: {}", config.voices_file.display());
    tracing::info!("Static files: {}", config.static_dir.display());
    tracing::info!("Upstream lite: {}", config.upstream.lite);
    tracing::info!("Upstream standard: {}", config.upstream.standard);

    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind to {}: {}", addr, e);
        e
    })?;

    tracing::info!("VARCO TTS tester running on http://{}", addr);

    axum::serve(listener, app).await
}
