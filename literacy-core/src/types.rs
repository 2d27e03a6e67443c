//! Shared data structures for media credibility analysis

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How strongly slanted a piece of content reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasLevel {
    #[serde(rename = "Low Bias")]
    Low,
    #[serde(rename = "Moderate Bias")]
    Moderate,
    #[serde(rename = "High Bias")]
    High,
}

impl BiasLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLevel::Low => "Low Bias",
            BiasLevel::Moderate => "Moderate Bias",
            BiasLevel::High => "High Bias",
        }
    }
}

impl Default for BiasLevel {
    fn default() -> Self {
        BiasLevel::Moderate
    }
}

impl fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall emotional tone of the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Neutral
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured credibility analysis of a single piece of content
///
/// Every numeric field is clamped to 0-100 at the ingestion boundary, enum
/// fields are coerced to their defaults, and `claims` holds at most three
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Composite trustworthiness score (0-100)
    pub overall_score: u8,
    /// How factually grounded the content appears (0-100)
    pub factuality: u8,
    /// Source and author credibility estimate (0-100)
    pub credibility: u8,
    /// Detected slant bucket
    pub bias_level: BiasLevel,
    /// Brief explanation of the bias assessment
    pub bias_rationale: String,
    /// Up to three verifiable claims found in the content
    pub claims: Vec<String>,
    /// Overall tone
    pub sentiment: Sentiment,
    /// Brief explanation of the credibility assessment
    pub credibility_rationale: String,
    /// Content-safety issues worth surfacing to the reader
    pub safety_flags: Vec<String>,
}

/// Which path produced an [`AnalysisResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Parsed from a live model response
    Provider,
    /// Computed locally after the provider call failed
    Heuristic,
}

/// An analysis result tagged with its provenance
///
/// The degraded keyword fallback is shaped exactly like a real model reply,
/// so consumers must check `kind` rather than sniffing rationale text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisVerdict {
    pub kind: AnalysisKind,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl AnalysisVerdict {
    pub fn provider(result: AnalysisResult) -> Self {
        AnalysisVerdict {
            kind: AnalysisKind::Provider,
            result,
        }
    }

    pub fn heuristic(result: AnalysisResult) -> Self {
        AnalysisVerdict {
            kind: AnalysisKind::Heuristic,
            result,
        }
    }

    /// True when this verdict came from the local fallback path
    pub fn is_degraded(&self) -> bool {
        self.kind == AnalysisKind::Heuristic
    }
}

/// Raw provider-string extras attached by the extraction endpoint
///
/// Validated once at the extractor boundary and threaded through the cache,
/// the response envelope, and saved items unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisExtras {
    /// Plain-language rewrite of the article, if the endpoint produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_rewrite: Option<String>,
    /// Alternative coverage of the same story
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_sources: Vec<String>,
    /// Upstream bias commentary, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_check: Option<String>,
    /// Upstream credibility commentary, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<String>,
}

impl AnalysisExtras {
    pub fn is_empty(&self) -> bool {
        self.simple_rewrite.is_none()
            && self.other_sources.is_empty()
            && self.bias_check.is_none()
            && self.credibility_score.is_none()
    }
}

/// Normalized article content produced by the extractor
///
/// Always well-formed: upstream failures yield a fallback record that still
/// names the requested URL and its domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    pub url: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(flatten)]
    pub extras: AnalysisExtras,
}

/// Unified response returned by the analyze pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAnalysisResponse {
    /// Content fingerprint; doubles as the cache and dedupe key
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Mirror of `analysis.overall_score` for list rendering
    pub bias_score: u8,
    /// Mirror of `analysis.credibility` for list rendering
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Caller-supplied media category ("article", "video", ...)
    pub media_type: String,
    pub analysis: AnalysisVerdict,
    /// Creation time of the underlying record; cache hits keep the original
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extras: AnalysisExtras,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            overall_score: 80,
            factuality: 75,
            credibility: 70,
            bias_level: BiasLevel::Low,
            bias_rationale: "Balanced sourcing".to_string(),
            claims: vec!["Turnout rose".to_string()],
            sentiment: Sentiment::Neutral,
            credibility_rationale: "Named primary sources".to_string(),
            safety_flags: vec![],
        }
    }

    #[test]
    fn verdict_serializes_kind_alongside_result_fields() {
        let verdict = AnalysisVerdict::heuristic(sample_result());
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["kind"], "heuristic");
        assert_eq!(json["overallScore"], 80);
        assert_eq!(json["biasLevel"], "Low Bias");
    }

    #[test]
    fn bias_level_round_trips_through_display_labels() {
        for level in [BiasLevel::Low, BiasLevel::Moderate, BiasLevel::High] {
            let json = serde_json::to_value(level).unwrap();
            assert_eq!(json, level.as_str());
        }
    }

    #[test]
    fn empty_extras_are_omitted_from_the_envelope() {
        let response = MediaAnalysisResponse {
            id: "abc".to_string(),
            title: "Title".to_string(),
            content: "Body".to_string(),
            url: None,
            domain: None,
            bias_score: 80,
            confidence: 70,
            source_url: None,
            media_type: "article".to_string(),
            analysis: AnalysisVerdict::provider(sample_result()),
            timestamp: chrono::Utc::now(),
            extras: AnalysisExtras::default(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("simpleRewrite").is_none());
        assert!(json.get("otherSources").is_none());
        assert_eq!(json["mediaType"], "article");
    }
}
