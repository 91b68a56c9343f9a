use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::Command,
    time::timeout,
};

use crate::{
    classify::{ClassifyPolicy, classify_failure, kind_from_error_type},
    types::{ErrorKind, Segment, TranscriptResult},
};

/// Hard bound on one extraction call, in seconds. The subprocess does its
/// own retrying with proxy rotation, so a single call can legitimately run
/// for minutes.
pub const EXTRACT_TIMEOUT_SECS: u64 = 480;

/// The transcript boundary: one operation, so the concrete transport
/// (spawned process, HTTP call, library call) is swappable without
/// touching the scheduler.
#[async_trait]
pub trait TranscriptService: Send + Sync {
    async fn fetch(&self, video_id: &str) -> TranscriptResult;
}

/// Wire document the extraction subprocess emits as its single stdout line.
/// Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct WireDocument {
    success: bool,
    #[serde(default)]
    segments: Vec<WireSegment>,
    #[serde(default, rename = "fullText")]
    full_text: String,
    #[serde(default, rename = "segmentCount")]
    segment_count: usize,
    #[serde(default = "first_attempt")]
    attempt: u32,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSegment {
    // Older extractor builds emitted this field as "time".
    #[serde(default, alias = "time")]
    start: f64,
    #[serde(default)]
    text: String,
}

fn first_attempt() -> u32 {
    1
}

/// Invokes the external per-item extraction process: spawn with the video id
/// as the final argument, relay stderr diagnostics as they arrive, collect
/// one JSON document from stdout, all bounded by a hard timeout.
pub struct SubprocessExtractor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    policy: ClassifyPolicy,
}

impl SubprocessExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(EXTRACT_TIMEOUT_SECS),
            policy: classify_failure,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: ClassifyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl TranscriptService for SubprocessExtractor {
    async fn fetch(&self, video_id: &str) -> TranscriptResult {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .arg(video_id)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return TranscriptResult::Failed {
                    message: format!("failed to spawn {}: {}", self.program, e),
                    kind: ErrorKind::ProcessError,
                };
            }
        };

        // Stderr is incremental diagnostics; relay each line in real time
        // and keep a copy for classification on failure.
        let stderr = child.stderr.take();
        let relay = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("    [extractor] {}", line);
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        });

        let mut stdout_pipe = child.stdout.take();
        let mut stdout = String::new();
        let waited = timeout(self.timeout, async {
            if let Some(out) = stdout_pipe.as_mut() {
                let _ = out.read_to_string(&mut stdout).await;
            }
            child.wait().await
        })
        .await;

        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                relay.abort();
                return TranscriptResult::Failed {
                    message: format!("failed waiting on extractor: {}", e),
                    kind: ErrorKind::ProcessError,
                };
            }
            Err(_) => {
                let _ = child.kill().await;
                relay.abort();
                return TranscriptResult::Failed {
                    message: format!(
                        "extraction exceeded {}s for {}",
                        self.timeout.as_secs(),
                        video_id
                    ),
                    kind: ErrorKind::Timeout,
                };
            }
        };

        let stderr_text = relay.await.unwrap_or_default();
        interpret_output(status.success(), &stdout, &stderr_text, self.policy)
    }
}

/// Turn the collected process output into a result. Split out of `fetch` so
/// the parse/classification paths are testable without spawning anything.
fn interpret_output(
    exited_ok: bool,
    stdout: &str,
    stderr: &str,
    policy: ClassifyPolicy,
) -> TranscriptResult {
    let doc: WireDocument = match serde_json::from_str(stdout.trim()) {
        Ok(doc) => doc,
        Err(e) => {
            if !exited_ok {
                let detail = stderr.lines().last().unwrap_or("no diagnostics").to_string();
                return TranscriptResult::Failed {
                    message: format!("extractor exited abnormally: {}", detail),
                    kind: policy(stderr),
                };
            }
            return TranscriptResult::Failed {
                message: format!("unparsable extractor output: {}", e),
                kind: ErrorKind::ParseError,
            };
        }
    };

    if doc.success {
        return TranscriptResult::Fetched {
            segments: doc
                .segments
                .into_iter()
                .map(|s| Segment { start: s.start, text: s.text })
                .collect(),
            full_text: doc.full_text,
            segment_count: doc.segment_count,
            attempt: doc.attempt,
        };
    }

    let message = doc.error.unwrap_or_else(|| "extraction failed".to_string());
    let kind = match doc.error_type.as_deref() {
        Some(tag) => kind_from_error_type(tag, &message, policy),
        None => policy(&message),
    };
    TranscriptResult::Failed { message, kind }
}
