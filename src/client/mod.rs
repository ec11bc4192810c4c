//! Client side of the tester: everything the browser page does, minus the DOM.

pub mod audio;
pub mod form;
pub mod http;
pub mod session;

use serde_json::Value;

pub use audio::{AudioClip, AudioSlot, WavInfo};
pub use form::{SynthesisForm, SynthesisPayload};
pub use http::RelayClient;
pub use session::{ActivityLog, BusyFlag, BusyGuard, Session};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    /// The relay answered with a non-ok envelope.
    #[error("{message}")]
    Relay {
        message: String,
        details: Option<Value>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// What the output pane shows for this failure: the relay's error body
    /// when there is one, the message otherwise.
    pub fn output(&self) -> String {
        match self {
            ClientError::Relay {
                details: Some(details),
                ..
            } => serde_json::to_string_pretty(details).unwrap_or_else(|_| self.to_string()),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_prefers_details() {
        let err = ClientError::Relay {
            message: "Unauthorized".into(),
            details: Some(json!({ "ok": false, "status": 401 })),
        };
        assert!(err.output().contains("\"status\": 401"));
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn test_output_falls_back_to_message() {
        let err = ClientError::Validation("text를 입력하세요.".into());
        assert_eq!(err.output(), "text를 입력하세요.");
    }
}
