use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::sync::Arc;

use super::{HealthResponse, SynthesizeResponse, VoicesBody, VoicesQuery, VoicesResponse};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::relay::SynthesisRequest;

/// Serves the cached catalog. Mounted on both GET and POST.
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    query: Result<Query<VoicesQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<VoicesResponse>, AppError> {
    // A query string or body that does not parse simply means "no reload".
    let query_reload = query.map(|Query(q)| q.wants_reload()).unwrap_or(false);
    let body_reload = serde_json::from_slice::<VoicesBody>(&body)
        .map(|b| b.reload)
        .unwrap_or(false);
    let reload = query_reload || body_reload;

    if reload {
        tracing::info!("Reloading voice catalog");
    }

    let voices = state.catalog.load(reload).await?;

    Ok(Json(VoicesResponse {
        ok: true,
        data: voices.to_vec(),
    }))
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    // Everything is checked before any network call.
    let validated = request.validate()?;

    let data = state.upstream.synthesize(&validated).await?;

    Ok(Json(SynthesizeResponse { ok: true, data }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
