//! Exercises the subprocess boundary against real child processes, using
//! `sh` as a stand-in for the extraction script. The trailing video-id
//! argument lands in `$0` of the `-c` script and is ignored.

use std::time::{Duration, Instant};

use kompas_core::{ErrorKind, SubprocessExtractor, TranscriptResult, TranscriptService};

fn shell(script: &str) -> SubprocessExtractor {
    SubprocessExtractor::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn collects_one_json_document_from_stdout() {
    let extractor = shell(
        r#"echo '{"success": true, "segments": [{"start": 0.0, "text": "hi", "duration": 1.5}], "fullText": "hi", "segmentCount": 1, "attempt": 2}'"#,
    );

    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Fetched { segments, full_text, segment_count, attempt } => {
            assert_eq!(segments.len(), 1);
            assert_eq!(full_text, "hi");
            assert_eq!(segment_count, 1);
            assert_eq!(attempt, 2);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn stderr_noise_does_not_affect_stdout_parsing() {
    let extractor = shell(
        r#"echo 'Fetching proxies...' >&2; echo 'Using proxy 10.0.0.1:8080' >&2; echo '{"success": true, "segments": [], "fullText": "", "segmentCount": 0}'"#,
    );

    assert!(matches!(
        extractor.fetch("dQw4w9WgXcQ").await,
        TranscriptResult::Fetched { .. }
    ));
}

#[tokio::test]
async fn timeout_kills_the_child_and_classifies_as_timeout() {
    let extractor = shell("sleep 30").with_timeout(Duration::from_millis(200));

    let started = Instant::now();
    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Failed { kind, message } => {
            assert_eq!(kind, ErrorKind::Timeout);
            assert!(message.contains("exceeded"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    // The call returned promptly instead of waiting out the sleep.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn nonzero_exit_classifies_diagnostics() {
    let extractor = shell("echo 'request blocked by upstream' >&2; exit 3");

    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Failed { kind, .. } => assert_eq!(kind, ErrorKind::IpBlocked),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn garbage_stdout_is_a_parse_error() {
    let extractor = shell("echo 'this is not json'");

    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Failed { kind, .. } => assert_eq!(kind, ErrorKind::ParseError),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn failure_document_is_classified_by_error_type() {
    let extractor = shell(
        r#"echo '{"success": false, "error": "No transcript available: captions disabled", "errorType": "NO_TRANSCRIPT", "segments": [], "fullText": "", "segmentCount": 0}'"#,
    );

    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Failed { kind, message } => {
            assert_eq!(kind, ErrorKind::NoTranscript);
            assert!(message.contains("captions disabled"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_program_is_a_process_error() {
    let extractor = SubprocessExtractor::new("definitely-not-a-real-binary-kompas", vec![]);

    match extractor.fetch("dQw4w9WgXcQ").await {
        TranscriptResult::Failed { kind, message } => {
            assert_eq!(kind, ErrorKind::ProcessError);
            assert!(message.contains("spawn"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
