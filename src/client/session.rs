use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::audio::{audio_from_response, AudioSlot};
use super::{ClientError, RelayClient, SynthesisForm};
use crate::catalog::{CatalogView, VoiceBrowser, VoiceRecord};
use crate::relay::Mode;

pub const VOICES_PLACEHOLDER: &str = "(아직 불러오지 않음)";
pub const SYNTH_PLACEHOLDER: &str = "(아직 요청 없음)";

/// Timestamped lines shown to the operator.
#[derive(Debug, Default)]
pub struct ActivityLog {
    lines: Vec<String>,
}

impl ActivityLog {
    pub fn push(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::info!("{}", line);
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.lines.push(format!("[{}] {}", ts, line));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Whether interactive controls are disabled for an in-flight request.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark busy until the returned guard is dropped.
    pub fn hold(&self) -> BusyGuard {
        self.0.store(true, Ordering::SeqCst);
        BusyGuard(Arc::clone(&self.0))
    }
}

/// Restores the controls on drop, whatever the outcome of the request.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// All client state of one tester page.
#[derive(Debug)]
pub struct Session {
    pub browser: VoiceBrowser,
    pub form: SynthesisForm,
    pub audio: AudioSlot,
    pub log: ActivityLog,
    pub busy: BusyFlag,
    pub voices_output: String,
    pub synth_output: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            browser: VoiceBrowser::new(),
            form: SynthesisForm::default(),
            audio: AudioSlot::new(),
            log: ActivityLog::default(),
            busy: BusyFlag::default(),
            voices_output: VOICES_PLACEHOLDER.to_string(),
            synth_output: SYNTH_PLACEHOLDER.to_string(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> CatalogView {
        CatalogView::render(&self.browser)
    }

    /// Fetch the catalog from the relay and rebuild the browser.
    pub async fn load_voices(
        &mut self,
        relay: &RelayClient,
        reload: bool,
    ) -> Result<usize, ClientError> {
        let result = self.try_load_voices(relay, reload).await;
        if let Err(e) = &result {
            self.voices_output = e.output();
            self.log.push(format!("voices error: {}", e));
        }
        result
    }

    async fn try_load_voices(
        &mut self,
        relay: &RelayClient,
        reload: bool,
    ) -> Result<usize, ClientError> {
        let _busy = self.busy.hold();
        self.log.push(format!(
            "loading local voices{}...",
            if reload { " (reload)" } else { "" }
        ));

        let raw = relay.voices(reload).await?;
        self.voices_output = serde_json::to_string_pretty(&raw).unwrap_or_default();

        let Value::Array(entries) = raw else {
            return Err(ClientError::Validation(
                "voice.json 형식이 배열이 아닙니다.".into(),
            ));
        };

        let count = self.browser.load(&entries);
        self.log.push(format!("voices loaded ({} items)", count));
        Ok(count)
    }

    pub fn set_query(&mut self, query: &str) {
        self.browser.set_query(query);
    }

    pub fn set_emotion(&mut self, emotion: &str) {
        self.browser.set_emotion(emotion);
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.browser.set_gender(gender);
    }

    pub fn set_actor(&mut self, actor: &str) {
        self.browser.set_actor(actor);
    }

    /// Pick a voice from the filtered list and copy its uuid into the form.
    pub fn select_voice(&mut self, uuid: &str) -> Option<&VoiceRecord> {
        if uuid.is_empty() {
            return self.browser.selected();
        }
        self.form.voice = uuid.to_string();
        self.log.push(format!("voice selected: {}", uuid));
        self.browser.select(uuid)
    }

    pub fn use_first_voice(&mut self) -> Option<&VoiceRecord> {
        let Some(uuid) = self.browser.select_first().map(|v| v.uuid.clone()) else {
            self.log.push("no voices to select");
            return None;
        };
        self.log.push(format!("voice set to first: {}", uuid));
        self.form.voice = uuid;
        self.browser.selected()
    }

    /// Switching tiers invalidates any audio from the previous one.
    pub fn set_mode(&mut self, mode: Mode) {
        self.form.mode = mode;
        self.audio.release();
    }

    pub fn clear(&mut self) {
        self.voices_output = VOICES_PLACEHOLDER.to_string();
        self.synth_output = SYNTH_PLACEHOLDER.to_string();
        self.log.clear();
        self.browser.clear();
        self.form.voice.clear();
        self.audio.release();
        self.log.push("cleared");
    }

    /// Submit the form. Returns `true` when playable audio came back.
    pub async fn synthesize(&mut self, relay: &RelayClient) -> Result<bool, ClientError> {
        let result = self.try_synthesize(relay).await;
        if let Err(e) = &result {
            self.synth_output = e.output();
            self.log.push(format!("synthesize error: {}", e));
        }
        result
    }

    async fn try_synthesize(&mut self, relay: &RelayClient) -> Result<bool, ClientError> {
        self.audio.release();
        let payload = self.form.to_payload()?;

        let _busy = self.busy.hold();
        self.log.push(format!("synthesizing ({})...", payload.mode));

        let data = relay.synthesize(&payload).await?;
        self.synth_output = serde_json::to_string_pretty(&data).unwrap_or_default();

        let Some(clip) = audio_from_response(&data)? else {
            self.log.push("no audio field found in response");
            return Ok(false);
        };

        if clip.wav().is_none() {
            self.log.push(format!(
                "audio payload is not a readable WAV stream ({} bytes)",
                clip.bytes().len()
            ));
        }

        self.audio.replace(clip);
        self.log.push("audio ready");
        Ok(true)
    }
}
