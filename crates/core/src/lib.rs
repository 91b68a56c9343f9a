//! Kompas enrichment core
//!
//! Batch pipeline that walks the video catalog, pulls time-coded transcripts
//! through an external subprocess boundary, runs AI content analysis over an
//! HTTP boundary, and writes results back. Strictly sequential, with fixed
//! pacing, failure classification, and idempotent resumption.

pub mod analyzer;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod extractor;
pub mod format;
pub mod pacing;
pub mod scheduler;
pub mod sections;
pub mod source;
pub mod stats;
pub mod types;

// Re-export commonly used items at crate root
pub use analyzer::{
    ANALYSIS_CONFIDENCE, ANALYSIS_TYPE, AnalysisOutcome, AnalysisService, AnalyzerConfig,
    HttpAnalyzer,
};
pub use catalog::{JsonFileCatalog, RecordCatalog, RecordUpdate, apply_update};
pub use classify::{ClassifyPolicy, classify_failure};
pub use error::{EnrichError, Result};
pub use extractor::{EXTRACT_TIMEOUT_SECS, SubprocessExtractor, TranscriptService};
pub use format::{format_stats_block, format_timestamp, format_transcript_with_timestamps};
pub use pacing::{DEFAULT_BATCH_SIZE, PacingConfig, Sleeper, TokioSleeper};
pub use scheduler::{Facet, Scheduler};
pub use source::video_id_from_source;
pub use stats::{Outcome, RunStats};
pub use types::{
    AnalysisPayload, EnrichmentStatus, ErrorKind, Segment, TranscriptPayload, TranscriptResult,
    VideoRecord,
};
