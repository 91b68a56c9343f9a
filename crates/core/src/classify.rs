use crate::types::ErrorKind;

/// Failure classification is a pluggable policy: the substrings below come
/// from the extraction subprocess's current error text and may drift.
pub type ClassifyPolicy = fn(&str) -> ErrorKind;

/// Default policy: substring heuristics over the failure text.
///
/// "IP" is matched case-sensitively so that ordinary words containing "ip"
/// ("skip", "description") do not read as a block signal.
pub fn classify_failure(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("blocked") || message.contains("IP") || message.contains("429") {
        ErrorKind::IpBlocked
    } else if lower.contains("transcript") || lower.contains("available") {
        ErrorKind::NoTranscript
    } else {
        ErrorKind::ProcessError
    }
}

/// Map an `errorType` tag reported by the subprocess, falling back to the
/// message policy for tags we do not recognize.
pub fn kind_from_error_type(
    error_type: &str,
    message: &str,
    policy: ClassifyPolicy,
) -> ErrorKind {
    match error_type {
        "IP_BLOCKED" => ErrorKind::IpBlocked,
        "NO_TRANSCRIPT" => ErrorKind::NoTranscript,
        "TIMEOUT" => ErrorKind::Timeout,
        _ => policy(message),
    }
}
