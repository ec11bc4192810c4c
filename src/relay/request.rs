use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::AppError;

/// Upstream API tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lite,
    Standard,
}

impl Mode {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "lite" => Ok(Mode::Lite),
            "standard" => Ok(Mode::Standard),
            other => Err(AppError::InvalidMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Lite => "lite",
            Mode::Standard => "standard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthesis request as posted by the browser. Every field is kept loose so
/// that validation can report on exactly what was wrong.
#[derive(Debug, Default, Deserialize)]
pub struct SynthesisRequest {
    #[serde(rename = "apiKey")]
    pub api_key: Option<Value>,
    pub mode: Option<Value>,
    pub text: Option<Value>,
    pub language: Option<Value>,
    pub voice: Option<Value>,
    pub speed: Option<Value>,
    pub pitch: Option<Value>,
    pub n_fm_steps: Option<Value>,
    pub seed: Option<Value>,
    pub return_metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Properties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<Number>,
}

/// Body sent to the upstream `/synthesize` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub text: String,
    pub language: String,
    pub voice: String,
    pub properties: Properties,
    pub return_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_fm_steps: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Number>,
}

/// A request that passed validation and is ready to forward.
#[derive(Clone)]
pub struct ValidatedRequest {
    pub api_key: String,
    pub mode: Mode,
    pub payload: UpstreamPayload,
}

impl fmt::Debug for ValidatedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedRequest")
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("payload", &self.payload)
            .finish()
    }
}

impl SynthesisRequest {
    /// Check every field in a fixed order and build the upstream payload.
    /// The first failing check wins.
    pub fn validate(&self) -> Result<ValidatedRequest, AppError> {
        let api_key = require_string(&self.api_key, "apiKey")?;
        let mode = Mode::parse(&require_string(&self.mode, "mode")?)?;

        let text = require_string(&self.text, "text")?;
        let language = require_string(&self.language, "language")?;
        let voice = require_string(&self.voice, "voice")?;
        let return_metadata = truthy(self.return_metadata.as_ref());

        let speed = optional_number(&self.speed)?;
        let pitch = optional_number(&self.pitch)?;
        let n_fm_steps = optional_number(&self.n_fm_steps)?;
        let seed = optional_number(&self.seed)?;

        let standard = mode == Mode::Standard;

        Ok(ValidatedRequest {
            api_key,
            mode,
            payload: UpstreamPayload {
                text,
                language,
                voice,
                properties: Properties { speed, pitch },
                return_metadata,
                n_fm_steps: n_fm_steps.filter(|_| standard),
                seed: seed.filter(|_| standard),
            },
        })
    }
}

fn require_string(value: &Option<Value>, name: &str) -> Result<String, AppError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(AppError::Validation(format!("{} is required", name))),
    }
}

/// Accept numbers or numeric strings. Absent, null, and blank values are
/// omitted rather than sent as zero.
pub fn optional_number(value: &Option<Value>) -> Result<Option<Number>, AppError> {
    let invalid = || AppError::Validation("Invalid number".into());

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) if n.is_f64() => {
            n.as_f64().and_then(to_number).map(Some).ok_or_else(invalid)
        }
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let parsed: f64 = trimmed.parse().map_err(|_| invalid())?;
            to_number(parsed).map(Some).ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

/// Integral values become JSON integers so `"42"` is forwarded as `42`.
fn to_number(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
