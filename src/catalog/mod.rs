pub mod filter;
pub mod view;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::AppError;

pub use filter::{FilterDomains, VoiceBrowser, VoiceFilter};
pub use view::CatalogView;
pub use voice::VoiceRecord;

/// Raw catalog entries exactly as they appear in the source file.
pub type RawCatalog = Arc<Vec<Value>>;

/// Process-scoped cache of the static voice catalog.
///
/// The cache is swapped as a whole. A caller racing a reload may get either
/// the old or the new catalog; the file is never read while the lock is held.
pub struct CatalogStore {
    path: PathBuf,
    cached: RwLock<Option<RawCatalog>>,
}

impl CatalogStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cached: RwLock::new(None),
        }
    }

    /// Return the cached catalog, reading the source first when nothing is
    /// cached or when `reload` is set.
    pub async fn load(&self, reload: bool) -> Result<RawCatalog, AppError> {
        if reload {
            self.invalidate();
        }

        if let Some(voices) = self.cached() {
            return Ok(voices);
        }

        let voices = Arc::new(read_catalog(&self.path).await?);
        tracing::info!(
            "Loaded {} catalog entries from {}",
            voices.len(),
            self.path.display()
        );

        {
            let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
            *cached = Some(Arc::clone(&voices));
        }

        Ok(voices)
    }

    pub fn invalidate(&self) {
        let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
        *cached = None;
    }

    pub fn cached(&self) -> Option<RawCatalog> {
        let cached = self.cached.read().unwrap_or_else(|e| e.into_inner());
        cached.as_ref().map(Arc::clone)
    }
}

async fn read_catalog(path: &Path) -> Result<Vec<Value>, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Catalog(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let data: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::Catalog(format!("voice.json is not valid JSON: {}", e)))?;

    match data {
        Value::Array(entries) => Ok(entries),
        _ => Err(AppError::Catalog("voice.json must be an array".into())),
    }
}
