use kompas_core::{
    AnalysisPayload, EnrichError, EnrichmentStatus, JsonFileCatalog, RecordCatalog,
    RecordUpdate, Segment, TranscriptPayload, VideoRecord,
};

fn record(id: &str) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        source_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
        title: None,
        description: None,
        transcript: None,
        analysis: None,
        status: EnrichmentStatus::Pending,
    }
}

fn transcript_payload() -> TranscriptPayload {
    TranscriptPayload {
        segments: vec![
            Segment { start: 0.0, text: "first".into() },
            Segment { start: 4.2, text: "second".into() },
        ],
        full_text: "first second".into(),
        segment_count: 2,
    }
}

fn analysis_payload() -> AnalysisPayload {
    AnalysisPayload {
        raw_output: "## Suggested Hashtags\n- #x\n".into(),
        takeaways: vec![],
        pathways: vec![],
        hashtags: vec!["#x".into()],
        skills: vec![],
        analysis_type: "career_exploration".into(),
        confidence: 0.8,
        analyzed_at: 1_700_000_000,
    }
}

async fn seeded_catalog(dir: &tempfile::TempDir, records: &[VideoRecord]) -> JsonFileCatalog {
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, serde_json::to_string_pretty(records).unwrap())
        .await
        .unwrap();
    JsonFileCatalog::new(path)
}

#[tokio::test]
async fn lists_records_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir, &[record("a"), record("b"), record("c")]).await;

    let records = catalog.list().await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(records[0].status, EnrichmentStatus::Pending);
}

#[tokio::test]
async fn transcript_update_is_partial_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut second = record("b");
    second.title = Some("Kept Title".into());
    let catalog = seeded_catalog(&dir, &[record("a"), second]).await;

    catalog
        .update("b", RecordUpdate::Transcript(transcript_payload()))
        .await
        .unwrap();

    let records = catalog.list().await.unwrap();
    let a = &records[0];
    let b = &records[1];
    assert!(a.transcript.is_none());
    assert_eq!(b.status, EnrichmentStatus::Enriched);
    assert_eq!(b.title.as_deref(), Some("Kept Title"));
    let stored = b.transcript.as_ref().unwrap();
    assert_eq!(stored.segment_count, 2);
    assert_eq!(stored.segments[1].start, 4.2);
}

#[tokio::test]
async fn analysis_update_fills_missing_metadata_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = record("a");
    rec.title = Some("Original".into());
    rec.transcript = Some(transcript_payload());
    let catalog = seeded_catalog(&dir, &[rec]).await;

    catalog
        .update(
            "a",
            RecordUpdate::Analysis {
                payload: analysis_payload(),
                title: Some("From API".into()),
                description: Some("api description".into()),
            },
        )
        .await
        .unwrap();

    let records = catalog.list().await.unwrap();
    let a = &records[0];
    // Existing title wins; missing description is filled in.
    assert_eq!(a.title.as_deref(), Some("Original"));
    assert_eq!(a.description.as_deref(), Some("api description"));
    // The earlier transcript is untouched.
    assert!(a.transcript.is_some());
    assert_eq!(a.analysis.as_ref().unwrap().hashtags, vec!["#x"]);
}

#[tokio::test]
async fn mark_failed_keeps_stored_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = record("a");
    rec.transcript = Some(transcript_payload());
    let catalog = seeded_catalog(&dir, &[rec]).await;

    catalog.update("a", RecordUpdate::MarkFailed).await.unwrap();

    let records = catalog.list().await.unwrap();
    assert_eq!(records[0].status, EnrichmentStatus::Failed);
    assert!(records[0].transcript.is_some());
}

#[tokio::test]
async fn unknown_record_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seeded_catalog(&dir, &[record("a")]).await;

    let err = catalog
        .update("missing", RecordUpdate::MarkFailed)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::UnknownRecord { .. }));
}

#[tokio::test]
async fn missing_file_is_catalog_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = JsonFileCatalog::new(dir.path().join("nope.json"));

    let err = catalog.list().await.unwrap_err();
    assert!(matches!(err, EnrichError::CatalogUnavailable { .. }));
}

#[tokio::test]
async fn malformed_file_is_catalog_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, "{ not json ]").await.unwrap();
    let catalog = JsonFileCatalog::new(path);

    let err = catalog.list().await.unwrap_err();
    assert!(matches!(err, EnrichError::CatalogUnavailable { .. }));
}

#[tokio::test]
async fn records_round_trip_with_optional_fields_absent() {
    // Minimal documents, as the original catalog stores them before any
    // enrichment has run.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    tokio::fs::write(
        &path,
        r#"[{"id": "r1", "source_url": "https://youtu.be/dQw4w9WgXcQ"}]"#,
    )
    .await
    .unwrap();
    let catalog = JsonFileCatalog::new(path);

    let records = catalog.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, EnrichmentStatus::Pending);
    assert!(records[0].transcript.is_none());
    assert!(records[0].analysis.is_none());
}
