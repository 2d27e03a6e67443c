//! Gemini-backed credibility analysis
//!
//! Wraps the generateContent endpoint behind a per-session quota. Transport
//! and parse failures degrade to the keyword heuristic instead of surfacing
//! an error, so once the quota check passes the caller always gets a
//! verdict.

use std::sync::Arc;
use std::time::Duration;

use literacy_core::{
    clip_to_boundary, AnalysisResult, AnalysisVerdict, BiasLevel, MediaError, MediaResult,
    Sentiment,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::heuristic::heuristic_analysis;
use crate::session::Session;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Article body bytes included in the prompt
const PROMPT_CONTENT_LIMIT: usize = 3000;
const MAX_CLAIMS: usize = 3;
const DEFAULT_SCORE: u8 = 50;

/// Configuration for the analysis provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl ProviderConfig {
    /// Read the API key from the `GEMINI_API_KEY` environment variable
    pub fn from_env() -> MediaResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| MediaError::config("GEMINI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Quota-limited client for the Gemini generateContent endpoint
pub struct AnalysisProvider {
    client: Client,
    config: ProviderConfig,
    session: Arc<Session>,
}

impl AnalysisProvider {
    pub fn new(config: ProviderConfig, session: Arc<Session>) -> MediaResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MediaError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Provider calls left in the current session
    pub fn calls_remaining(&self) -> u32 {
        self.session.calls_remaining()
    }

    /// Analyze content, degrading to the heuristic when the provider fails
    ///
    /// Consumes one quota slot per attempt regardless of outcome. Quota
    /// exhaustion is the only error this returns; every failure past the
    /// quota check resolves to a heuristic verdict.
    #[instrument(skip(self, title, content, source_url), fields(title = %title))]
    pub async fn analyze(
        &self,
        title: &str,
        content: &str,
        source_url: Option<&str>,
    ) -> MediaResult<AnalysisVerdict> {
        self.session.begin_call()?;

        match self.request_analysis(title, content, source_url).await {
            Ok(result) => Ok(AnalysisVerdict::provider(result)),
            Err(err) => {
                warn!(error = %err, "provider analysis failed, using heuristic fallback");
                Ok(AnalysisVerdict::heuristic(heuristic_analysis(
                    title, content,
                )))
            }
        }
    }

    async fn request_analysis(
        &self,
        title: &str,
        content: &str,
        source_url: Option<&str>,
    ) -> MediaResult<AnalysisResult> {
        let prompt = build_prompt(title, content, source_url);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MediaError::provider_unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MediaError::provider_unavailable(format!(
                "Gemini API error: {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| MediaError::parse(format!("malformed provider response: {e}")))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| MediaError::parse("provider response contained no candidate text"))?;

        parse_analysis(&text)
    }
}

/// generateContent request body
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

/// generateContent reply, tolerant of missing pieces
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Render the instruction prompt sent to the model
fn build_prompt(title: &str, content: &str, source_url: Option<&str>) -> String {
    let source_line = source_url
        .map(|url| format!("Source URL: {url}"))
        .unwrap_or_default();
    let body = clip_to_boundary(content, PROMPT_CONTENT_LIMIT);

    format!(
        r#"Analyze the following article for bias, credibility, and factuality. Respond ONLY with a valid JSON object in this exact format:

{{
  "overallScore": <number 0-100>,
  "factuality": <number 0-100>,
  "credibility": <number 0-100>,
  "biasLevel": "<Low Bias|Moderate Bias|High Bias>",
  "biasRationale": "<brief explanation>",
  "claims": ["<claim1>", "<claim2>", "<claim3>"],
  "sentiment": "<Positive|Negative|Neutral>",
  "credibilityRationale": "<brief explanation>",
  "safetyFlags": ["<flag1>", "<flag2>"]
}}

Article Title: {title}
{source_line}
Content: {body}...

Focus on:
- Factual accuracy and verifiable claims
- Source credibility and author expertise
- Political/ideological bias indicators
- Emotional language vs. neutral reporting
- Evidence quality and citation practices"#
    )
}

/// Parse a raw model reply into a sanitized analysis
fn parse_analysis(text: &str) -> MediaResult<AnalysisResult> {
    let json = extract_json(text)?;
    let value: Value = serde_json::from_str(&json)
        .map_err(|e| MediaError::parse(format!("invalid analysis JSON: {e}")))?;
    Ok(sanitize_analysis(&value))
}

/// Extract JSON from a response that might contain markdown code blocks
fn extract_json(content: &str) -> MediaResult<String> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try plain code blocks
    if let Some(start) = content.find("```") {
        let start = start + 3;
        // Skip language identifier if present
        let start = content[start..]
            .find('\n')
            .map(|n| start + n + 1)
            .unwrap_or(start);
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try to find raw JSON
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if end > start {
                return Ok(content[start..=end].to_string());
            }
        }
    }

    Err(MediaError::parse("No JSON found in response"))
}

/// Coerce a raw model reply into the validated result shape
///
/// Scores clamp to 0-100 and fall back to 50 when missing or non-numeric.
/// Unknown enum labels coerce to their defaults, claims cap at three
/// entries, and non-string list entries are kept as their JSON text.
fn sanitize_analysis(value: &Value) -> AnalysisResult {
    let bias_level = match value.get("biasLevel").and_then(Value::as_str) {
        Some("Low Bias") => BiasLevel::Low,
        Some("High Bias") => BiasLevel::High,
        _ => BiasLevel::Moderate,
    };

    let sentiment = match value.get("sentiment").and_then(Value::as_str) {
        Some("Positive") => Sentiment::Positive,
        Some("Negative") => Sentiment::Negative,
        _ => Sentiment::Neutral,
    };

    AnalysisResult {
        overall_score: score_field(value, "overallScore"),
        factuality: score_field(value, "factuality"),
        credibility: score_field(value, "credibility"),
        bias_level,
        bias_rationale: text_field(value, "biasRationale"),
        claims: string_list(value, "claims", MAX_CLAIMS),
        sentiment,
        credibility_rationale: text_field(value, "credibilityRationale"),
        safety_flags: string_list(value, "safetyFlags", usize::MAX),
    }
}

fn score_field(value: &Value, field: &str) -> u8 {
    value
        .get(field)
        .and_then(Value::as_f64)
        .map(|score| score.clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_SCORE)
}

fn text_field(value: &Value, field: &str) -> String {
    match value.get(field).and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "Analysis not available".to_string(),
    }
}

fn string_list(value: &Value, field: &str, limit: usize) -> Vec<String> {
    match value.get(field).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .take(limit)
            .map(|item| match item.as_str() {
                Some(text) => text.to_string(),
                None => item.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}
