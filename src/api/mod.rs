pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `?reload=1` or `?reload=true` on either method.
#[derive(Debug, Default, Deserialize)]
pub struct VoicesQuery {
    pub reload: Option<String>,
}

impl VoicesQuery {
    pub fn wants_reload(&self) -> bool {
        matches!(self.reload.as_deref(), Some("1") | Some("true"))
    }
}

/// Optional POST body for `/api/voices`.
#[derive(Debug, Default, Deserialize)]
pub struct VoicesBody {
    #[serde(default)]
    pub reload: bool,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub ok: bool,
    pub data: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub ok: bool,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
