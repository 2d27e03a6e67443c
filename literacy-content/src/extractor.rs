//! Article extraction from URLs
//!
//! Talks to the extraction endpoint and normalizes its loose payload into
//! an [`ExtractedContent`] record. A malformed input URL is the only error,
//! raised before any network call; every failure past that point resolves
//! to a fallback record so extraction never blocks the analyze flow.

use std::time::Duration;

use literacy_core::{AnalysisExtras, ExtractedContent};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};
use url::Url;

use crate::ContentError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the extraction endpoint
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub endpoint: String,
}

impl ExtractorConfig {
    /// Read the endpoint from the `EXTRACTOR_ENDPOINT` environment variable
    pub fn from_env() -> Result<Self, ContentError> {
        let endpoint = std::env::var("EXTRACTOR_ENDPOINT").map_err(|_| {
            ContentError::InvalidConfig(
                "EXTRACTOR_ENDPOINT environment variable not set".to_string(),
            )
        })?;
        Ok(Self { endpoint })
    }

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

/// Client for the article extraction endpoint
pub struct ContentExtractor {
    client: Client,
    config: ExtractorConfig,
}

impl ContentExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ContentError::RequestFailed(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Extract article content from a URL
    #[instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, ContentError> {
        validate_url(url)?;

        match self.fetch_payload(url).await {
            Ok(content) => Ok(content),
            Err(err) => {
                warn!(error = %err, url, "content extraction failed, using fallback record");
                Ok(fallback_content(url))
            }
        }
    }

    async fn fetch_payload(&self, url: &str) -> Result<ExtractedContent, ContentError> {
        let request_url = format!("{}?url={}", self.config.endpoint, urlencoding::encode(url));

        let response = self
            .client
            .get(&request_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ContentError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ContentError::ApiError {
                status: response.status().as_u16(),
                message: "extraction endpoint returned an error".to_string(),
            });
        }

        let payload: ExtractPayload = response
            .json()
            .await
            .map_err(|e| ContentError::ParseError(e.to_string()))?;

        map_payload(url, payload)
    }
}

/// Loose upstream payload; every part is optional
#[derive(Debug, Default, Deserialize)]
struct ExtractPayload {
    #[serde(default)]
    extracted: Option<ExtractedFields>,
    #[serde(default)]
    extracted_news: Option<ExtractedNewsFields>,
    #[serde(default)]
    other_sources: Option<Value>,
    #[serde(default)]
    bias_check: Option<Value>,
    #[serde(default)]
    credibility_score: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractedFields {
    title: Option<String>,
    summary: Option<String>,
    #[serde(alias = "publishDate")]
    publish_date: Option<String>,
    author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractedNewsFields {
    full_text: Option<String>,
    simple_rewrite: Option<String>,
}

/// Map the upstream payload into a normalized record
///
/// Rejects payloads that carry neither a title nor a body; empty strings
/// count as absent.
fn map_payload(url: &str, payload: ExtractPayload) -> Result<ExtractedContent, ContentError> {
    let extracted = payload.extracted.unwrap_or_default();
    let news = payload.extracted_news.unwrap_or_default();

    let title = extracted.title.filter(|t| !t.is_empty());
    let full_text = news.full_text.filter(|t| !t.is_empty());

    if title.is_none() && full_text.is_none() {
        return Err(ContentError::ParseError(
            "incomplete content extracted from URL".to_string(),
        ));
    }

    let domain = extract_domain(url);
    let content = full_text
        .or_else(|| extracted.summary.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "Content extraction failed".to_string());

    Ok(ExtractedContent {
        title: title.unwrap_or_else(|| format!("Content from {domain}")),
        content,
        url: url.to_string(),
        domain,
        publish_date: extracted.publish_date.filter(|d| !d.is_empty()),
        author: extracted.author.filter(|a| !a.is_empty()),
        extras: AnalysisExtras {
            simple_rewrite: news.simple_rewrite.filter(|s| !s.is_empty()),
            other_sources: string_entries(payload.other_sources),
            bias_check: loose_string(payload.bias_check),
            credibility_score: loose_string(payload.credibility_score),
        },
    })
}

/// Check that the input parses as an http or https URL
fn validate_url(input: &str) -> Result<(), ContentError> {
    match Url::parse(input) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ContentError::InvalidUrl(input.to_string())),
    }
}

/// Hostname of the URL, or a placeholder when it cannot be parsed
fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown-domain.com".to_string())
}

/// Placeholder record returned when extraction fails
fn fallback_content(url: &str) -> ExtractedContent {
    let domain = extract_domain(url);
    ExtractedContent {
        title: format!("Content from {domain}"),
        content: format!(
            "Unable to extract full content from {url}. \
             Please paste the article text directly for analysis."
        ),
        url: url.to_string(),
        domain,
        publish_date: None,
        author: None,
        extras: AnalysisExtras::default(),
    }
}

/// Keep only string entries from a loose JSON array
fn string_entries(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Coerce a loose scalar into a display string
fn loose_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(num)) => Some(num.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_from(value: Value) -> ExtractPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn full_payload_maps_every_field() {
        let payload = payload_from(json!({
            "extracted": {
                "title": "Council approves budget",
                "summary": "Short summary",
                "publish_date": "2025-03-14",
                "author": "A. Writer"
            },
            "extracted_news": {
                "full_text": "The full article body.",
                "simple_rewrite": "A simpler version."
            },
            "other_sources": ["https://example.org/coverage", 42, null],
            "bias_check": "Leans neutral",
            "credibility_score": 87
        }));

        let content = map_payload("https://example.com/story", payload).unwrap();

        assert_eq!(content.title, "Council approves budget");
        assert_eq!(content.content, "The full article body.");
        assert_eq!(content.domain, "example.com");
        assert_eq!(content.publish_date.as_deref(), Some("2025-03-14"));
        assert_eq!(content.author.as_deref(), Some("A. Writer"));
        assert_eq!(
            content.extras.simple_rewrite.as_deref(),
            Some("A simpler version.")
        );
        // Non-string entries are dropped at the boundary
        assert_eq!(
            content.extras.other_sources,
            vec!["https://example.org/coverage"]
        );
        assert_eq!(content.extras.bias_check.as_deref(), Some("Leans neutral"));
        assert_eq!(content.extras.credibility_score.as_deref(), Some("87"));
    }

    #[test]
    fn camel_case_publish_date_is_accepted() {
        let payload = payload_from(json!({
            "extracted": { "title": "Titled", "publishDate": "2025-03-14" }
        }));

        let content = map_payload("https://example.com/story", payload).unwrap();
        assert_eq!(content.publish_date.as_deref(), Some("2025-03-14"));
    }

    #[test]
    fn summary_stands_in_for_a_missing_body() {
        let payload = payload_from(json!({
            "extracted": { "title": "Titled", "summary": "Only a summary" }
        }));

        let content = map_payload("https://example.com/story", payload).unwrap();
        assert_eq!(content.content, "Only a summary");
    }

    #[test]
    fn missing_title_falls_back_to_the_domain() {
        let payload = payload_from(json!({
            "extracted_news": { "full_text": "Body only." }
        }));

        let content = map_payload("https://news.example.com/a", payload).unwrap();
        assert_eq!(content.title, "Content from news.example.com");
        assert_eq!(content.content, "Body only.");
    }

    #[test]
    fn payload_without_title_or_body_is_rejected() {
        let payload = payload_from(json!({
            "extracted": { "summary": "Summary only" }
        }));

        let err = map_payload("https://example.com/story", payload).unwrap_err();
        assert!(matches!(err, ContentError::ParseError(_)));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let payload = payload_from(json!({
            "extracted": { "title": "" },
            "extracted_news": { "full_text": "" }
        }));

        assert!(map_payload("https://example.com/story", payload).is_err());
    }

    #[test]
    fn domain_extraction_tolerates_garbage() {
        assert_eq!(extract_domain("https://example.com/a/b"), "example.com");
        assert_eq!(extract_domain("not a url"), "unknown-domain.com");
    }

    #[tokio::test]
    async fn malformed_urls_fail_before_any_request() {
        let extractor = ContentExtractor::new(ExtractorConfig::new("http://127.0.0.1:9")).unwrap();

        let err = extractor.extract("not a url").await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));

        let err = extractor.extract("ftp://example.com/file").await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_the_fallback_record() {
        let extractor = ContentExtractor::new(ExtractorConfig::new("http://127.0.0.1:9")).unwrap();

        let content = extractor.extract("https://example.com/story").await.unwrap();

        assert_eq!(content.domain, "example.com");
        assert_eq!(content.title, "Content from example.com");
        assert!(content
            .content
            .contains("Unable to extract full content from https://example.com/story"));
        assert!(content.extras.is_empty());
    }
}
