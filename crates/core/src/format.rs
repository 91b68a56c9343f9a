use crate::{stats::RunStats, types::TranscriptPayload};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &TranscriptPayload) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the running statistics block printed after every batch.
pub fn format_stats_block(stats: &RunStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "progress: {}/{} processed\n",
        stats.processed, stats.total
    ));
    out.push_str(&format!("  successful:        {}\n", stats.successful));
    out.push_str(&format!("  failed:            {}\n", stats.failed));
    out.push_str(&format!("  no transcript:     {}\n", stats.no_transcript));
    out.push_str(&format!("  blocked:           {}\n", stats.blocked));
    out.push_str(&format!("  already had data:  {}\n", stats.already_had_result));
    out.push_str(&format!(
        "throughput: {:.1} items/min",
        stats.items_per_minute()
    ));
    out
}
