use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde_json::Value;

use super::voice::{normalize_catalog, VoiceRecord};

/// Current filter selections. Empty fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceFilter {
    pub query: String,
    pub emotion: String,
    pub gender: String,
    pub actor: String,
}

impl VoiceFilter {
    pub fn matches(&self, voice: &VoiceRecord) -> bool {
        if !self.emotion.is_empty() && voice.emotion != self.emotion {
            return false;
        }
        if !self.gender.is_empty() && voice.gender != self.gender {
            return false;
        }
        if !self.actor.is_empty() && voice.saas_name != self.actor {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        query.is_empty() || voice.haystack().contains(&query)
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.emotion.is_empty()
            && self.gender.is_empty()
            && self.actor.is_empty()
    }
}

/// Distinct values offered by each filter dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDomains {
    pub emotions: Vec<String>,
    pub genders: Vec<String>,
    pub actors: Vec<String>,
}

impl FilterDomains {
    pub fn build(voices: &[VoiceRecord]) -> Self {
        Self {
            emotions: unique_sorted(voices.iter().map(|v| v.emotion.as_str())),
            genders: unique_sorted(voices.iter().map(|v| v.gender.as_str())),
            actors: unique_sorted(voices.iter().map(|v| v.saas_name.as_str())),
        }
    }
}

/// Deduplicated, empties removed, ordered with the Korean collation.
pub fn unique_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();

    match korean_collator() {
        Some(collator) => out.sort_by(|a, b| collator.compare(a, b)),
        None => tracing::warn!("Korean collation unavailable, using code point order"),
    }
    out
}

fn korean_collator() -> Option<Collator> {
    Collator::try_new(&locale!("ko").into(), CollatorOptions::new()).ok()
}

/// Live-filtered view over an immutable catalog.
///
/// The master list is only ever replaced wholesale by [`VoiceBrowser::load`];
/// filtering rebuilds the derived view and never touches it.
#[derive(Debug, Default)]
pub struct VoiceBrowser {
    voices: Vec<VoiceRecord>,
    domains: FilterDomains,
    filter: VoiceFilter,
    visible: Vec<usize>,
    selected: Option<String>,
}

impl VoiceBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog. Dropdown filters are reset because their domains
    /// are rebuilt; the free-text query and a still-visible selection survive.
    pub fn load(&mut self, raw: &[Value]) -> usize {
        self.voices = normalize_catalog(raw);
        self.domains = FilterDomains::build(&self.voices);
        self.filter = VoiceFilter {
            query: std::mem::take(&mut self.filter.query),
            ..VoiceFilter::default()
        };
        self.apply();
        self.voices.len()
    }

    /// Drop the catalog, filters, and selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.apply();
    }

    pub fn set_emotion(&mut self, emotion: impl Into<String>) {
        self.filter.emotion = emotion.into();
        self.apply();
    }

    pub fn set_gender(&mut self, gender: impl Into<String>) {
        self.filter.gender = gender.into();
        self.apply();
    }

    pub fn set_actor(&mut self, actor: impl Into<String>) {
        self.filter.actor = actor.into();
        self.apply();
    }

    pub fn set_filter(&mut self, filter: VoiceFilter) {
        self.filter = filter;
        self.apply();
    }

    /// Recompute the visible set. Returns `true` if the selection was dropped
    /// because it is no longer visible.
    pub fn apply(&mut self) -> bool {
        self.visible = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| self.filter.matches(v))
            .map(|(i, _)| i)
            .collect();

        let still_visible = self
            .selected
            .as_deref()
            .map(|uuid| self.filtered().any(|v| v.uuid == uuid));

        match still_visible {
            Some(false) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    /// Select a visible voice by uuid. An empty uuid leaves the selection
    /// untouched; an unknown one clears it.
    pub fn select(&mut self, uuid: &str) -> Option<&VoiceRecord> {
        if uuid.is_empty() {
            return self.selected();
        }

        let found = self
            .filtered()
            .find(|v| v.uuid == uuid)
            .map(|v| v.uuid.clone());
        self.selected = found;
        self.selected()
    }

    pub fn select_first(&mut self) -> Option<&VoiceRecord> {
        let first = self.filtered().next().map(|v| v.uuid.clone());
        self.selected = first;
        self.selected()
    }

    pub fn selected(&self) -> Option<&VoiceRecord> {
        let uuid = self.selected.as_deref()?;
        self.filtered().find(|v| v.uuid == uuid)
    }

    pub fn filtered(&self) -> impl Iterator<Item = &VoiceRecord> + '_ {
        self.visible.iter().map(move |&i| &self.voices[i])
    }

    pub fn voices(&self) -> &[VoiceRecord] {
        &self.voices
    }

    pub fn domains(&self) -> &FilterDomains {
        &self.domains
    }

    pub fn filter(&self) -> &VoiceFilter {
        &self.filter
    }

    pub fn total_count(&self) -> usize {
        self.voices.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}
