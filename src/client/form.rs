use serde::Serialize;

use super::ClientError;
use crate::relay::Mode;

/// Form state behind the synthesis panel. Numeric inputs stay as typed text.
#[derive(Debug, Clone)]
pub struct SynthesisForm {
    pub api_key: String,
    pub mode: Mode,
    pub text: String,
    pub language: String,
    pub voice: String,
    pub speed: String,
    pub pitch: String,
    pub n_fm_steps: String,
    pub seed: String,
    pub return_metadata: bool,
}

impl Default for SynthesisForm {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            mode: Mode::Lite,
            text: "안녕하세요. VARCO 보이스로 텍스트를 합성합니다.".to_string(),
            language: "korean".to_string(),
            voice: String::new(),
            speed: String::new(),
            pitch: String::new(),
            n_fm_steps: String::new(),
            seed: String::new(),
            return_metadata: false,
        }
    }
}

/// Body posted to the relay's `/api/synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisPayload {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub mode: Mode,
    pub text: String,
    pub language: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_fm_steps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<f64>,
    pub return_metadata: bool,
}

impl SynthesisForm {
    /// Seed and step count only apply to the standard tier.
    pub fn standard_fields_visible(&self) -> bool {
        self.mode == Mode::Standard
    }

    /// Check the required inputs in order: API key, voice, text, language.
    /// Nothing is sent unless all four pass.
    pub fn to_payload(&self) -> Result<SynthesisPayload, ClientError> {
        let api_key = self.api_key.trim();
        let voice = self.voice.trim();
        let text = self.text.trim();
        let language = self.language.trim();

        if api_key.is_empty() {
            return Err(ClientError::Validation("OPENAPI_KEY를 입력하세요.".into()));
        }
        if voice.is_empty() {
            return Err(ClientError::Validation(
                "voice를 선택하거나 UUID를 입력하세요.".into(),
            ));
        }
        if text.is_empty() {
            return Err(ClientError::Validation("text를 입력하세요.".into()));
        }
        if language.is_empty() {
            return Err(ClientError::Validation("language를 입력하세요.".into()));
        }

        Ok(SynthesisPayload {
            api_key: api_key.to_string(),
            mode: self.mode,
            text: text.to_string(),
            language: language.to_string(),
            voice: voice.to_string(),
            speed: number_or_none(&self.speed),
            pitch: number_or_none(&self.pitch),
            n_fm_steps: number_or_none(&self.n_fm_steps),
            seed: number_or_none(&self.seed),
            return_metadata: self.return_metadata,
        })
    }
}

/// Blank or unparsable inputs are left out; the relay stays the authority
/// on numeric validation.
pub fn number_or_none(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
