use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::relay::UpstreamClient;

/// Request bodies larger than this are rejected before reaching a handler.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct AppState {
    pub catalog: CatalogStore,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            catalog: CatalogStore::new(config.voices_file.clone()),
            upstream: UpstreamClient::new(config.upstream.clone()),
        }
    }
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route(
            "/voices",
            get(handlers::list_voices).post(handlers::list_voices),
        )
        .route("/synthesize", post(handlers::synthesize))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
