use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("mode must be lite|standard")]
    InvalidMode(String),

    #[error("Upstream returned {status} {status_text}")]
    Upstream {
        status: u16,
        status_text: String,
        content_type: String,
        body: String,
    },

    #[error("Upstream request failed: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),

    #[error("{0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// Upstream failure echoed back to the caller as-is.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamErrorResponse {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub content_type: String,
    pub body: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidMode(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Catalog(_) | AppError::IoError(_) | AppError::JsonError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::Upstream {
                status: upstream_status,
                status_text,
                content_type,
                body,
            } => {
                tracing::warn!(
                    "Upstream failed: {} {} ({} bytes)",
                    upstream_status,
                    status_text,
                    body.len()
                );
                (
                    status,
                    Json(UpstreamErrorResponse {
                        ok: false,
                        status: upstream_status,
                        status_text,
                        content_type,
                        body,
                    }),
                )
                    .into_response()
            }
            other => {
                let message = other.to_string();
                if status.is_server_error() {
                    tracing::error!("Request failed: {} - {}", status, message);
                } else {
                    tracing::warn!("Request rejected: {} - {}", status, message);
                }
                (
                    status,
                    Json(ErrorResponse {
                        ok: false,
                        error: message,
                    }),
                )
                    .into_response()
            }
        }
    }
}
