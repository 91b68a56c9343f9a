use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::{EnrichError, Result},
    sections::derive_fields,
    types::AnalysisPayload,
};

/// The external service reports no confidence of its own; the pipeline
/// assigns this constant.
pub const ANALYSIS_CONFIDENCE: f64 = 0.8;
pub const ANALYSIS_TYPE: &str = "career_exploration";
pub const DEFAULT_ANALYSIS_URL: &str = "https://api.kome.ai/api/tools/video-insights";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.0-flash";

static ANALYSIS_PROMPT: &str = r#"Analyze this career story video for a career-exploration audience.

Return markdown structured into exactly these sections, each a heading followed by bullet points:

## Key Themes and Environments
## Soft Skills Demonstrated
## Challenges Highlighted
## Aspirational and Emotional Elements
## Suggested Hashtags
## Recommended Career Paths
## Reflective Prompts

Rules:
- Every section must use "- " bullets, one idea per bullet
- Suggested Hashtags bullets must each be a single #hashtag
- Recommended Career Paths should name 3-5 concrete pathways
- Keep bullets short and grounded in what the video actually shows"#;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_url: String,
    pub model: String,
    pub language: String,
    pub api_key_env: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ANALYSIS_URL.to_string(),
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            language: "en".to_string(),
            api_key_env: "VIDEO_INSIGHTS_API_KEY".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Validate that the API key is set for the analysis endpoint.
    pub fn validate_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| EnrichError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })
    }
}

/// What one analysis call produced: the persisted payload plus the basic
/// metadata the endpoint reports alongside it.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub title: Option<String>,
    pub description: Option<String>,
    pub payload: AnalysisPayload,
}

/// The content-analysis boundary. Failures here are binary: no transcript
/// taxonomy applies, callers catch and log.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, source_url: &str) -> Result<AnalysisOutcome>;
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    output: String,
}

pub struct HttpAnalyzer {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

impl HttpAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalyzer {
    async fn analyze(&self, source_url: &str) -> Result<AnalysisOutcome> {
        let api_key = self.config.validate_api_key()?;

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "url": source_url,
                "prompt": ANALYSIS_PROMPT,
                "model": self.config.model,
                "language": self.config.language,
                "output_format": "markdown",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Analysis {
                url: source_url.to_string(),
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        let parsed: AnalysisResponse = response.json().await?;
        Ok(build_outcome(parsed.title, parsed.description, parsed.output))
    }
}

/// Assemble the persisted payload from the endpoint's markdown body.
pub fn build_outcome(title: String, description: String, raw_output: String) -> AnalysisOutcome {
    let derived = derive_fields(&raw_output);
    AnalysisOutcome {
        title: non_empty(title),
        description: non_empty(description),
        payload: AnalysisPayload {
            takeaways: derived.takeaways,
            pathways: derived.pathways,
            hashtags: derived.hashtags,
            skills: derived.skills,
            analysis_type: ANALYSIS_TYPE.to_string(),
            confidence: ANALYSIS_CONFIDENCE,
            analyzed_at: unix_now(),
            raw_output,
        },
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_carries_constants_and_derived_lists() {
        let body = "## Soft Skills Demonstrated\n- teamwork\n- patience\n\n\
                    ## Suggested Hashtags\n- #welding\n- #trades\n"
            .to_string();
        let outcome = build_outcome("A Day as a Welder".into(), String::new(), body);
        assert_eq!(outcome.title.as_deref(), Some("A Day as a Welder"));
        assert_eq!(outcome.description, None);
        assert_eq!(outcome.payload.skills, vec!["teamwork", "patience"]);
        assert_eq!(outcome.payload.hashtags, vec!["#welding", "#trades"]);
        assert_eq!(outcome.payload.confidence, ANALYSIS_CONFIDENCE);
        assert_eq!(outcome.payload.analysis_type, ANALYSIS_TYPE);
        assert!(outcome.payload.analyzed_at > 0);
    }
}
