//! The section-extraction grammar: pulling bulleted lists out of
//! heading-delimited markdown, as a line-oriented state machine so behavior
//! on malformed or partial markdown stays deterministic.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_SKILLS: usize = 10;
pub const MAX_PATHWAYS: usize = 5;
pub const MAX_HASHTAGS: usize = 8;

pub const HEADING_KEY_THEMES: &str = "Key Themes and Environments";
pub const HEADING_SOFT_SKILLS: &str = "Soft Skills Demonstrated";
pub const HEADING_CHALLENGES: &str = "Challenges Highlighted";
pub const HEADING_ASPIRATIONAL: &str = "Aspirational and Emotional Elements";
pub const HEADING_HASHTAGS: &str = "Suggested Hashtags";
pub const HEADING_CAREER_PATHS: &str = "Recommended Career Paths";
pub const HEADING_REFLECTIVE: &str = "Reflective Prompts";

/// Fallback vocabulary for the keyword-membership pass, used when the model
/// did not produce dependable headings.
pub const SKILL_VOCABULARY: &[&str] = &[
    "communication",
    "teamwork",
    "leadership",
    "problem solving",
    "adaptability",
    "creativity",
    "time management",
    "critical thinking",
    "collaboration",
    "attention to detail",
    "empathy",
    "resilience",
    "organization",
    "initiative",
    "customer service",
];

pub const PATHWAY_VOCABULARY: &[&str] = &[
    "healthcare",
    "engineering",
    "technology",
    "education",
    "skilled trades",
    "creative arts",
    "business",
    "science",
    "public service",
    "agriculture",
    "hospitality",
];

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern"));

/// Lists derived from one raw markdown body.
#[derive(Debug, Clone, Default)]
pub struct DerivedFields {
    pub takeaways: Vec<String>,
    pub pathways: Vec<String>,
    pub hashtags: Vec<String>,
    pub skills: Vec<String>,
}

/// Capture the bullet items under the first line beginning with `heading`
/// (case-insensitive). Collection stops at the next heading line, at the
/// first non-bullet prose line, or at end of text. A missing section yields
/// an empty list; it is never an error.
pub fn extract_section(text: &str, heading: &str) -> Vec<String> {
    let wanted = heading.to_lowercase();
    let mut items = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if !in_section {
            if is_heading_match(line, &wanted) {
                in_section = true;
            }
            continue;
        }
        if let Some(item) = bullet_text(line) {
            items.push(item);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        // Next heading or stray prose ends the section either way.
        break;
    }

    items
}

/// Token-pattern hashtag extraction across the whole text, first occurrence
/// order, deduplicated, capped at [`MAX_HASHTAGS`].
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for found in HASHTAG.find_iter(text) {
        let tag = found.as_str().to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == MAX_HASHTAGS {
            break;
        }
    }
    tags
}

/// Keyword-membership extraction: case-insensitive substring search against
/// a fixed vocabulary, capped at `cap` terms.
pub fn extract_keywords(text: &str, vocabulary: &[&str], cap: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|term| lower.contains(&term.to_lowercase()))
        .take(cap)
        .map(|term| (*term).to_string())
        .collect()
}

/// Compose the full derivation for one analysis body.
pub fn derive_fields(output: &str) -> DerivedFields {
    let mut takeaways = extract_section(output, HEADING_KEY_THEMES);
    if takeaways.is_empty() {
        takeaways = extract_section(output, HEADING_CHALLENGES);
    }

    let mut pathways = extract_section(output, HEADING_CAREER_PATHS);
    if pathways.is_empty() {
        pathways = extract_keywords(output, PATHWAY_VOCABULARY, MAX_PATHWAYS);
    }
    pathways.truncate(MAX_PATHWAYS);

    let mut skills = extract_section(output, HEADING_SOFT_SKILLS);
    if skills.is_empty() {
        skills = extract_keywords(output, SKILL_VOCABULARY, MAX_SKILLS);
    }
    skills.truncate(MAX_SKILLS);

    DerivedFields {
        takeaways,
        hashtags: extract_hashtags(output),
        pathways,
        skills,
    }
}

fn is_heading_match(line: &str, wanted_lower: &str) -> bool {
    if bullet_text(line).is_some() {
        return false;
    }
    let stripped = line
        .trim()
        .trim_start_matches('#')
        .trim_start_matches('*')
        .trim();
    stripped.to_lowercase().starts_with(wanted_lower)
}

fn is_heading_line(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('#') || t.starts_with("**")
}

/// Strip a bullet marker (`-`, `•`, `* `, or `N.`) and surrounding
/// whitespace; `None` when the line is not a bullet or is empty after
/// stripping.
fn bullet_text(line: &str) -> Option<String> {
    let t = line.trim();
    if is_heading_line(line) {
        return None;
    }
    if let Some(rest) = t.strip_prefix('-').or_else(|| t.strip_prefix('•')) {
        // "---" is a horizontal rule, not a bullet.
        if rest.starts_with('-') {
            return None;
        }
        return non_empty(rest);
    }
    if let Some(rest) = t.strip_prefix("* ") {
        return non_empty(rest);
    }
    let digits = t.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = t[digits..].strip_prefix('.') {
            return non_empty(rest);
        }
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
