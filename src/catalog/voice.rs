use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

pub const MALE: &str = "남성";
pub const FEMALE: &str = "여성";

// Candidate keys per field, in priority order. The first key present on
// the raw entry wins, even when its value is empty.
const UUID_KEYS: &[&str] = &[
    "speaker_uuid",
    "speakerUuid",
    "uuid",
    "id",
    "speaker_name",
    "speakerName",
    "name",
];
const SPEAKER_NAME_KEYS: &[&str] = &[
    "speaker_name",
    "speakerName",
    "name",
    "display_name",
    "displayName",
];
const SAAS_NAME_KEYS: &[&str] = &["saas_name", "saasName"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc"];

lazy_static! {
    static ref NAME_EMOTION_REGEX: Regex = Regex::new(r"^(.*?)(?:\(([^)]+)\))?$").unwrap();
}

/// A catalog entry after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRecord {
    pub uuid: String,
    pub speaker_name: String,
    pub base_name: String,
    pub emotion: String,
    pub saas_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub gender: String,
    #[serde(skip)]
    pub raw: Value,
}

impl VoiceRecord {
    /// Normalize a loosely-shaped catalog entry.
    pub fn from_raw(item: &Value) -> Self {
        let uuid = first_present(item, UUID_KEYS);
        let speaker_name = first_present(item, SPEAKER_NAME_KEYS);
        let saas_name = first_present(item, SAAS_NAME_KEYS);
        let description = first_present(item, DESCRIPTION_KEYS);

        let tags = split_tags(&description);
        let gender = derive_gender(&tags).to_string();
        let (base_name, emotion) = parse_name_emotion(&speaker_name);

        Self {
            uuid,
            speaker_name,
            base_name,
            emotion,
            saas_name,
            description,
            tags,
            gender,
            raw: item.clone(),
        }
    }

    /// Records without a uuid or a speaker name never enter the active catalog.
    pub fn is_usable(&self) -> bool {
        !self.uuid.is_empty() && !self.speaker_name.is_empty()
    }

    /// Lowercased text the free-text query is matched against.
    pub fn haystack(&self) -> String {
        [
            self.uuid.as_str(),
            self.speaker_name.as_str(),
            self.base_name.as_str(),
            self.emotion.as_str(),
            self.saas_name.as_str(),
            self.description.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

/// Normalize a whole catalog, silently dropping unusable entries.
pub fn normalize_catalog(raw: &[Value]) -> Vec<VoiceRecord> {
    let voices: Vec<VoiceRecord> = raw
        .iter()
        .map(VoiceRecord::from_raw)
        .filter(VoiceRecord::is_usable)
        .collect();

    if voices.len() < raw.len() {
        tracing::debug!(
            "Dropped {} catalog entries without uuid or speaker name",
            raw.len() - voices.len()
        );
    }

    voices
}

fn first_present(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match item.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_to_string(value)),
        })
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn split_tags(description: &str) -> Vec<String> {
    description
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Male wins when both markers are tagged.
pub fn derive_gender(tags: &[String]) -> &'static str {
    if tags.iter().any(|t| t == MALE) {
        MALE
    } else if tags.iter().any(|t| t == FEMALE) {
        FEMALE
    } else {
        ""
    }
}

/// Split `"name(emotion)"` into base name and emotion.
pub fn parse_name_emotion(name: &str) -> (String, String) {
    let cleaned = name.trim();

    let (base, emotion) = match NAME_EMOTION_REGEX.captures(cleaned) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""),
            caps.get(2).map(|m| m.as_str().trim()).unwrap_or(""),
        ),
        None => ("", ""),
    };

    let base = if base.is_empty() { cleaned } else { base };
    (base.to_string(), emotion.to_string())
}
