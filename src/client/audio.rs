use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use serde_json::Value;

use super::ClientError;

/// Format details of a decoded WAV payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub duration_secs: f64,
}

/// Decoded synthesis audio, ready to play or save.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    bytes: Vec<u8>,
    wav: Option<WavInfo>,
}

impl AudioClip {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let wav = inspect_wav(&bytes);
        Self { bytes, wav }
    }

    /// Decode standard base64, ignoring embedded whitespace and line breaks.
    pub fn from_base64(encoded: &str) -> Result<Self, ClientError> {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `None` when the payload is not a readable WAV stream.
    pub fn wav(&self) -> Option<&WavInfo> {
        self.wav.as_ref()
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Play the clip on the default output device, blocking until it ends.
    #[cfg(feature = "audio-playback")]
    pub fn play(&self) -> Result<(), ClientError> {
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| ClientError::Playback(e.to_string()))?;
        let sink =
            rodio::Sink::try_new(&handle).map_err(|e| ClientError::Playback(e.to_string()))?;
        let source = rodio::Decoder::new(Cursor::new(self.bytes.clone()))
            .map_err(|e| ClientError::Playback(e.to_string()))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

fn inspect_wav(bytes: &[u8]) -> Option<WavInfo> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        reader.duration() as f64 / spec.sample_rate as f64
    };

    Some(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        duration_secs,
    })
}

/// Read the `audio` field of a synthesis response. Absent or empty audio is
/// not an error.
pub fn audio_from_response(data: &Value) -> Result<Option<AudioClip>, ClientError> {
    match data.get("audio").and_then(Value::as_str) {
        Some(encoded) if !encoded.is_empty() => AudioClip::from_base64(encoded).map(Some),
        _ => Ok(None),
    }
}

/// Holds at most one playable clip.
#[derive(Debug, Default)]
pub struct AudioSlot {
    current: Option<AudioClip>,
    released: usize,
}

impl AudioSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new clip, releasing the previous one first.
    pub fn replace(&mut self, clip: AudioClip) -> &AudioClip {
        self.release();
        self.current.insert(clip)
    }

    pub fn release(&mut self) {
        if let Some(old) = self.current.take() {
            tracing::debug!("Released audio clip ({} bytes)", old.bytes.len());
            self.released += 1;
        }
    }

    pub fn current(&self) -> Option<&AudioClip> {
        self.current.as_ref()
    }

    /// Number of clips released over the slot's lifetime.
    pub fn released_count(&self) -> usize {
        self.released
    }
}
