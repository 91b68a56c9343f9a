use std::sync::Arc;

use crate::{
    analyzer::AnalysisService,
    catalog::{RecordCatalog, RecordUpdate},
    error::Result,
    extractor::TranscriptService,
    format::{format_stats_block, format_timestamp},
    pacing::{DEFAULT_BATCH_SIZE, PacingConfig, Sleeper, TokioSleeper},
    source::video_id_from_source,
    stats::{Outcome, RunStats},
    types::{ErrorKind, TranscriptPayload, TranscriptResult, VideoRecord},
};

/// The two enrichment kinds applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Transcript,
    Analysis,
}

impl Facet {
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Transcript => "transcript",
            Facet::Analysis => "analysis",
        }
    }
}

/// Owns the run loop: partitions eligible records into fixed-size batches,
/// drives the boundaries strictly sequentially through the pacing policy,
/// enforces idempotency, and aggregates statistics.
pub struct Scheduler {
    catalog: Arc<dyn RecordCatalog>,
    transcripts: Arc<dyn TranscriptService>,
    analyzer: Arc<dyn AnalysisService>,
    sleeper: Arc<dyn Sleeper>,
    pacing: PacingConfig,
    batch_size: usize,
    limit: Option<usize>,
}

impl Scheduler {
    pub fn new(
        catalog: Arc<dyn RecordCatalog>,
        transcripts: Arc<dyn TranscriptService>,
        analyzer: Arc<dyn AnalysisService>,
    ) -> Self {
        Self {
            catalog,
            transcripts,
            analyzer,
            sleeper: Arc::new(TokioSleeper),
            pacing: PacingConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Process at most this many eligible records this run.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Run one facet over the whole catalog. Returns the final statistics;
    /// the only error that aborts the run is losing the catalog itself.
    pub async fn run(&self, facet: Facet) -> Result<RunStats> {
        let records = self.catalog.list().await?;
        let mut eligible: Vec<VideoRecord> = records
            .into_iter()
            .filter(|r| self.eligible(facet, r))
            .collect();
        if let Some(limit) = self.limit {
            eligible.truncate(limit);
        }

        let mut stats = RunStats::new(eligible.len());
        let batches: Vec<&[VideoRecord]> = eligible.chunks(self.batch_size).collect();
        let total_batches = batches.len();
        println!(
            "starting {} run: {} eligible records in {} batches of up to {}",
            facet.label(),
            eligible.len(),
            total_batches,
            self.batch_size
        );

        for (index, batch) in batches.iter().enumerate() {
            println!("\nbatch {}/{} ({} items)", index + 1, total_batches, batch.len());
            let blocked = self.process_batch(facet, batch, &mut stats).await?;

            println!("{}", format_stats_block(&stats));

            if index + 1 == total_batches {
                continue;
            }
            if blocked {
                println!(
                    "block detected, cooling down {}s before next batch",
                    self.pacing.block_cooldown.as_secs()
                );
                self.sleeper.sleep(self.pacing.block_cooldown).await;
            } else {
                self.sleeper.sleep(self.pacing.inter_batch).await;
            }
        }

        Ok(stats)
    }

    fn eligible(&self, facet: Facet, record: &VideoRecord) -> bool {
        match facet {
            Facet::Transcript => video_id_from_source(&record.source_url).is_some(),
            Facet::Analysis => !record.source_url.trim().is_empty(),
        }
    }

    fn already_done(&self, facet: Facet, record: &VideoRecord) -> bool {
        match facet {
            Facet::Transcript => record.has_transcript(),
            Facet::Analysis => record.has_analysis(),
        }
    }

    /// Process one batch strictly in order. Returns true when a block signal
    /// interrupted it; items not yet attempted stay pending for the next run.
    async fn process_batch(
        &self,
        facet: Facet,
        batch: &[VideoRecord],
        stats: &mut RunStats,
    ) -> Result<bool> {
        let mut invoked_in_batch = false;
        for record in batch {
            if self.already_done(facet, record) {
                println!("  - {} already has {}, skipping", record.id, facet.label());
                stats.record(Outcome::AlreadyHadResult);
                continue;
            }

            // Pacing applies to boundary calls only; skipped items above
            // consume no delay.
            if invoked_in_batch {
                self.sleeper.sleep(self.pacing.inter_request).await;
            }
            invoked_in_batch = true;

            let outcome = match facet {
                Facet::Transcript => self.process_transcript(record).await?,
                Facet::Analysis => self.process_analysis(record).await?,
            };
            stats.record(outcome);

            if outcome == Outcome::Blocked {
                println!(
                    "  ! block signal on {}, abandoning remainder of batch",
                    record.id
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn process_transcript(&self, record: &VideoRecord) -> Result<Outcome> {
        // Eligibility filtering guarantees the id derives.
        let Some(video_id) = video_id_from_source(&record.source_url) else {
            return Ok(Outcome::Failed);
        };

        match self.transcripts.fetch(&video_id).await {
            TranscriptResult::Fetched { segments, full_text, segment_count, attempt } => {
                let runtime = segments.last().map(|s| s.start).unwrap_or(0.0);
                println!(
                    "  + {} transcribed: {} segments, ~{} (attempt {})",
                    record.id,
                    segment_count,
                    format_timestamp(runtime),
                    attempt
                );
                let payload = TranscriptPayload { segments, full_text, segment_count };
                self.catalog
                    .update(&record.id, RecordUpdate::Transcript(payload))
                    .await?;
                Ok(Outcome::Successful)
            }
            TranscriptResult::Failed { message, kind } => {
                println!(
                    "  x {} ({}) [{}]: {}",
                    record.id,
                    record.short_title(),
                    kind.label(),
                    message
                );
                Ok(match kind {
                    ErrorKind::IpBlocked => Outcome::Blocked,
                    ErrorKind::NoTranscript => Outcome::NoTranscript,
                    ErrorKind::Timeout | ErrorKind::ParseError | ErrorKind::ProcessError => {
                        Outcome::Failed
                    }
                })
            }
        }
    }

    async fn process_analysis(&self, record: &VideoRecord) -> Result<Outcome> {
        match self.analyzer.analyze(&record.source_url).await {
            Ok(outcome) => {
                println!(
                    "  + {} analyzed: {} takeaways, {} pathways, {} hashtags, {} skills",
                    record.id,
                    outcome.payload.takeaways.len(),
                    outcome.payload.pathways.len(),
                    outcome.payload.hashtags.len(),
                    outcome.payload.skills.len()
                );
                self.catalog
                    .update(
                        &record.id,
                        RecordUpdate::Analysis {
                            payload: outcome.payload,
                            title: outcome.title,
                            description: outcome.description,
                        },
                    )
                    .await?;
                Ok(Outcome::Successful)
            }
            Err(e) => {
                println!("  x {} ({}): {}", record.id, record.short_title(), e);
                self.catalog
                    .update(&record.id, RecordUpdate::MarkFailed)
                    .await?;
                Ok(Outcome::Failed)
            }
        }
    }
}
