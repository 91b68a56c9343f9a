use std::time::Instant;

/// How one item's processing ended. Exactly one of these is recorded per
/// processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Successful,
    Failed,
    NoTranscript,
    Blocked,
    AlreadyHadResult,
}

/// Run-wide counters, threaded through the scheduler as an explicit value
/// and returned at run end. Initialized once, never reset.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub no_transcript: usize,
    pub blocked: usize,
    pub already_had_result: usize,
    started: Instant,
}

impl RunStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            successful: 0,
            failed: 0,
            no_transcript: 0,
            blocked: 0,
            already_had_result: 0,
            started: Instant::now(),
        }
    }

    /// Count one item: `processed` plus exactly one outcome counter.
    pub fn record(&mut self, outcome: Outcome) {
        self.processed += 1;
        match outcome {
            Outcome::Successful => self.successful += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::NoTranscript => self.no_transcript += 1,
            Outcome::Blocked => self.blocked += 1,
            Outcome::AlreadyHadResult => self.already_had_result += 1,
        }
    }

    /// Invariant: always equals `processed`.
    pub fn outcome_sum(&self) -> usize {
        self.successful + self.failed + self.no_transcript + self.blocked + self.already_had_result
    }

    pub fn items_per_minute(&self) -> f64 {
        let minutes = self.started.elapsed().as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.processed as f64 / minutes
        } else {
            0.0
        }
    }
}
