use serde::{Deserialize, Serialize};

/// One catalog entry: an externally sourced video and its enrichment state.
///
/// Records are owned by the catalog; the pipeline only ever applies partial
/// updates through [`crate::catalog::RecordUpdate`] and never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<TranscriptPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisPayload>,
    #[serde(default)]
    pub status: EnrichmentStatus,
}

impl VideoRecord {
    /// Idempotency check for the transcript facet.
    pub fn has_transcript(&self) -> bool {
        self.transcript
            .as_ref()
            .is_some_and(|t| !t.segments.is_empty())
    }

    /// Idempotency check for the analysis facet.
    pub fn has_analysis(&self) -> bool {
        self.analysis
            .as_ref()
            .is_some_and(|a| !a.raw_output.is_empty())
    }

    pub fn short_title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }
}

/// Persisted transcript: the success payload of one extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptPayload {
    pub segments: Vec<Segment>,
    pub full_text: String,
    pub segment_count: usize,
}

/// One time-coded transcript segment. `start` is in seconds, matching the
/// field name the extraction subprocess emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub text: String,
}

/// Persisted analysis: raw markdown from the AI endpoint plus the lists
/// derived from it by the section-extraction grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub raw_output: String,
    pub takeaways: Vec<String>,
    pub pathways: Vec<String>,
    pub hashtags: Vec<String>,
    pub skills: Vec<String>,
    pub analysis_type: String,
    pub confidence: f64,
    /// Unix seconds at the time the analysis was stored.
    pub analyzed_at: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    Enriched,
    Failed,
}

/// Outcome of a single extraction attempt. Transient: only the success
/// payload is ever written back to the catalog.
#[derive(Debug, Clone)]
pub enum TranscriptResult {
    Fetched {
        segments: Vec<Segment>,
        full_text: String,
        segment_count: usize,
        /// Attempt counter reported by the subprocess; passed through
        /// transparently, retry is the subprocess's own concern.
        attempt: u32,
    },
    Failed {
        message: String,
        kind: ErrorKind,
    },
}

/// Classification of a failed extraction. This, not the raw message,
/// drives control flow: `IpBlocked` aborts the rest of the batch and
/// escalates the pacing delay to the block cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    ParseError,
    ProcessError,
    IpBlocked,
    NoTranscript,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::ProcessError => "PROCESS_ERROR",
            ErrorKind::IpBlocked => "IP_BLOCKED",
            ErrorKind::NoTranscript => "NO_TRANSCRIPT",
        }
    }
}
