use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    error::{EnrichError, Result},
    types::{AnalysisPayload, EnrichmentStatus, TranscriptPayload, VideoRecord},
};

/// Partial update to one record. The pipeline never replaces a record
/// wholesale and never deletes one.
#[derive(Debug, Clone)]
pub enum RecordUpdate {
    Transcript(TranscriptPayload),
    Analysis {
        payload: AnalysisPayload,
        title: Option<String>,
        description: Option<String>,
    },
    /// The analysis step failed; flag the record without discarding any
    /// previously stored work.
    MarkFailed,
}

/// The record catalog boundary: bulk read plus per-record partial update.
#[async_trait]
pub trait RecordCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<VideoRecord>>;
    async fn update(&self, id: &str, update: RecordUpdate) -> Result<()>;
}

/// Apply a partial update in place. Existing fields survive: an analysis
/// failure must never discard a previously extracted transcript or
/// already-known metadata.
pub fn apply_update(record: &mut VideoRecord, update: RecordUpdate) {
    match update {
        RecordUpdate::Transcript(payload) => {
            record.transcript = Some(payload);
            record.status = EnrichmentStatus::Enriched;
        }
        RecordUpdate::Analysis { payload, title, description } => {
            record.analysis = Some(payload);
            if record.title.is_none() {
                record.title = title;
            }
            if record.description.is_none() {
                record.description = description;
            }
            record.status = EnrichmentStatus::Enriched;
        }
        RecordUpdate::MarkFailed => {
            record.status = EnrichmentStatus::Failed;
        }
    }
}

/// File-backed catalog: one pretty-printed JSON array of records.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<VideoRecord>> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            EnrichError::CatalogUnavailable {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        serde_json::from_str(&raw).map_err(|e| EnrichError::CatalogUnavailable {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn store(&self, records: &[VideoRecord]) -> Result<()> {
        let pretty = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, pretty).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordCatalog for JsonFileCatalog {
    async fn list(&self) -> Result<Vec<VideoRecord>> {
        self.load().await
    }

    async fn update(&self, id: &str, update: RecordUpdate) -> Result<()> {
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EnrichError::UnknownRecord { id: id.to_string() })?;
        apply_update(record, update);
        self.store(&records).await
    }
}
