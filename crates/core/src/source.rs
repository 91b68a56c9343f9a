/// Derive the canonical external video id from a record's source reference.
///
/// Recognizes short links (`youtu.be/<id>`), long links
/// (`youtube.com/watch?v=<id>`), embed and shorts paths, and bare
/// 11-character ids. Anything else is not schedulable.
pub fn video_id_from_source(source: &str) -> Option<String> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }

    for marker in ["youtu.be/", "/embed/", "/shorts/"] {
        if let Some(pos) = source.find(marker) {
            return take_id(&source[pos + marker.len()..]);
        }
    }

    if source.contains("youtube.com") {
        if let Some(pos) = source.find("watch?v=") {
            return take_id(&source[pos + "watch?v=".len()..]);
        }
        if let Some(pos) = source.find("&v=") {
            return take_id(&source[pos + "&v=".len()..]);
        }
        return None;
    }

    if is_id_char_only(source) && source.len() == 11 {
        return Some(source.to_string());
    }
    None
}

fn take_id(rest: &str) -> Option<String> {
    let id: String = rest.chars().take_while(|c| is_id_char(*c)).collect();
    if id.len() == 11 { Some(id) } else { None }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_id_char_only(s: &str) -> bool {
    s.chars().all(is_id_char)
}
