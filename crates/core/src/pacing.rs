use std::time::Duration;

use async_trait::async_trait;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const INTER_REQUEST_DELAY: Duration = Duration::from_secs(3);
pub const INTER_BATCH_DELAY: Duration = Duration::from_secs(30);
pub const BLOCK_COOLDOWN: Duration = Duration::from_secs(300);

/// Fixed pacing knobs. The escalation rule itself (block → cooldown) lives
/// in the scheduler; the block condition is believed to be IP-scoped, so
/// the cooldown is deliberately coarse and pauses the whole run.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Delay before every boundary call within a batch except the first.
    pub inter_request: Duration,
    /// Delay between batches.
    pub inter_batch: Duration,
    /// Substituted for `inter_batch` after a block-classified failure.
    pub block_cooldown: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_request: INTER_REQUEST_DELAY,
            inter_batch: INTER_BATCH_DELAY,
            block_cooldown: BLOCK_COOLDOWN,
        }
    }
}

/// Injectable sleep so tests can observe pacing without real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
