//! Presentation-independent view model of the voice browser.

use serde::Serialize;

use super::filter::VoiceBrowser;
use super::voice::VoiceRecord;

pub const EMOTION_PLACEHOLDER: &str = "(감정: 전체)";
pub const GENDER_PLACEHOLDER: &str = "(성별: 전체)";
pub const ACTOR_PLACEHOLDER: &str = "(saas_name: 전체)";
pub const VOICE_PLACEHOLDER: &str = "(보이스를 선택하세요)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectView {
    pub placeholder: &'static str,
    pub options: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceOption {
    pub value: String,
    pub label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceDetail {
    pub title: String,
    pub subtitle: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub count_line: String,
    pub emotion: SelectView,
    pub gender: SelectView,
    pub actor: SelectView,
    pub voice_placeholder: &'static str,
    pub voices: Vec<VoiceOption>,
    pub selected: String,
    /// `None` means the detail card is hidden.
    pub detail: Option<VoiceDetail>,
}

impl CatalogView {
    pub fn render(browser: &VoiceBrowser) -> Self {
        let domains = browser.domains();
        let filter = browser.filter();
        let selected = browser.selected();

        Self {
            count_line: count_line(browser.total_count(), browser.visible_count()),
            emotion: SelectView {
                placeholder: EMOTION_PLACEHOLDER,
                options: domains.emotions.clone(),
                selected: filter.emotion.clone(),
            },
            gender: SelectView {
                placeholder: GENDER_PLACEHOLDER,
                options: domains.genders.clone(),
                selected: filter.gender.clone(),
            },
            actor: SelectView {
                placeholder: ACTOR_PLACEHOLDER,
                options: domains.actors.clone(),
                selected: filter.actor.clone(),
            },
            voice_placeholder: VOICE_PLACEHOLDER,
            voices: browser.filtered().map(VoiceOption::from).collect(),
            selected: selected.map(|v| v.uuid.clone()).unwrap_or_default(),
            detail: selected.map(VoiceDetail::from),
        }
    }
}

pub fn count_line(total: usize, visible: usize) -> String {
    format!("전체 {}개 · 표시 {}개", total, visible)
}

impl From<&VoiceRecord> for VoiceOption {
    fn from(v: &VoiceRecord) -> Self {
        let label = if v.saas_name.is_empty() {
            v.speaker_name.clone()
        } else {
            format!("{} · {}", v.speaker_name, v.saas_name)
        };
        let title = if v.description.is_empty() {
            v.uuid.clone()
        } else {
            format!("{}\n{}", v.uuid, v.description)
        };

        Self {
            value: v.uuid.clone(),
            label,
            title,
        }
    }
}

impl From<&VoiceRecord> for VoiceDetail {
    fn from(v: &VoiceRecord) -> Self {
        let title = if v.speaker_name.is_empty() {
            v.uuid.clone()
        } else {
            v.speaker_name.clone()
        };

        let facets: Vec<&str> = [v.emotion.as_str(), v.saas_name.as_str(), v.gender.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        let subtitle = if facets.is_empty() {
            v.uuid.clone()
        } else {
            format!("{} · {}", v.uuid, facets.join(" · "))
        };

        Self {
            title,
            subtitle,
            description: (!v.description.is_empty()).then(|| v.description.clone()),
            tags: v.tags.clone(),
        }
    }
}
