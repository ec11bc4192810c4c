use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::{ClientError, SynthesisPayload};

/// Talks to the relay's `{ok, data | error}` envelope.
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn voices(&self, reload: bool) -> Result<Value, ClientError> {
        let path = if reload {
            "/api/voices?reload=1"
        } else {
            "/api/voices"
        };
        self.get_json(path).await
    }

    pub async fn synthesize(&self, payload: &SynthesisPayload) -> Result<Value, ClientError> {
        self.post_json("/api/synthesize", payload).await
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        unwrap_envelope(response).await
    }
}

async fn unwrap_envelope(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();
    envelope_data(status, body)
}

/// Pull `data` out of an ok envelope, or build the error the page would show.
pub fn envelope_data(status: StatusCode, body: Option<Value>) -> Result<Value, ClientError> {
    let ok = body
        .as_ref()
        .and_then(|b| b.get("ok"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if status.is_success() && ok {
        let data = body
            .and_then(|mut b| b.get_mut("data").map(Value::take))
            .unwrap_or(Value::Null);
        return Ok(data);
    }

    let field = |key: &str| {
        body.as_ref()
            .and_then(|b| b.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let message = field("error")
        .or_else(|| field("statusText"))
        .unwrap_or_else(|| {
            format!(
                "Request failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
        });

    Err(ClientError::Relay {
        message,
        details: body,
    })
}
