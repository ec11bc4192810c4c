pub mod request;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::config::UpstreamUrls;
use crate::error::AppError;

pub use request::{Mode, SynthesisRequest, UpstreamPayload, ValidatedRequest};

/// Header carrying the caller's API key upstream.
pub const API_KEY_HEADER: &str = "OPENAPI_KEY";

/// Forwards validated requests to the upstream TTS API. One attempt per
/// call: no timeout, no retry.
pub struct UpstreamClient {
    http: reqwest::Client,
    urls: UpstreamUrls,
}

impl UpstreamClient {
    pub fn new(urls: UpstreamUrls) -> Self {
        Self {
            http: reqwest::Client::new(),
            urls,
        }
    }

    pub fn base_url(&self, mode: Mode) -> &str {
        match mode {
            Mode::Lite => &self.urls.lite,
            Mode::Standard => &self.urls.standard,
        }
    }

    pub fn endpoint(&self, mode: Mode) -> String {
        format!("{}/synthesize", self.base_url(mode).trim_end_matches('/'))
    }

    /// Send the payload upstream. Success bodies are parsed as JSON when
    /// possible and otherwise passed through as a string.
    pub async fn synthesize(&self, request: &ValidatedRequest) -> Result<Value, AppError> {
        let api_key = HeaderValue::from_str(&request.api_key)
            .map_err(|_| AppError::Validation("apiKey contains invalid characters".into()))?;

        let url = self.endpoint(request.mode);
        tracing::info!(
            "Forwarding synthesis ({}, voice {}, {} chars) to {}",
            request.mode,
            request.payload.voice,
            request.payload.text.chars().count(),
            url
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&request.payload)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let raw = response.text().await?;

        if !status.is_success() {
            // reqwest drops the wire reason phrase; the canonical one is the
            // closest available and is empty for non-standard codes.
            return Err(AppError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                content_type,
                body: raw,
            });
        }

        tracing::debug!("Upstream returned {} ({} bytes)", status, raw.len());

        Ok(parse_lenient(raw))
    }
}

/// Structured data when the body is JSON, the raw text otherwise.
pub fn parse_lenient(raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw),
    }
}
