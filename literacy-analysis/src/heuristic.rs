//! Keyword-based fallback analysis
//!
//! Used whenever the provider cannot produce a usable reply. Deliberately
//! shaped exactly like a model analysis so the rest of the pipeline treats
//! both paths uniformly; the verdict's `kind` tag is what tells them apart.

use literacy_core::{AnalysisResult, BiasLevel, Sentiment};

const BIAS_WORDS: [&str; 6] = [
    "always", "never", "terrible", "amazing", "disaster", "perfect",
];
const POSITIVE_WORDS: [&str; 5] = ["good", "great", "excellent", "positive", "success"];
const NEGATIVE_WORDS: [&str; 5] = ["bad", "terrible", "awful", "negative", "failure"];

/// A bias penalty above this marks the content as high bias
const HIGH_BIAS_THRESHOLD: u8 = 60;
const MODERATE_BIAS_THRESHOLD: u8 = 30;

/// Best-effort offline analysis from fixed keyword lists
///
/// Deterministic for a given title and content. Each matched bias word adds
/// 20 points of penalty; the overall score starts from 75 and is floored at
/// zero.
pub fn heuristic_analysis(title: &str, content: &str) -> AnalysisResult {
    let text = format!("{title} {content}").to_lowercase();

    let bias_hits = count_matches(&text, &BIAS_WORDS);
    let positive_hits = count_matches(&text, &POSITIVE_WORDS);
    let negative_hits = count_matches(&text, &NEGATIVE_WORDS);

    let bias_penalty = (bias_hits * 20).min(100) as u8;

    let bias_level = if bias_penalty > HIGH_BIAS_THRESHOLD {
        BiasLevel::High
    } else if bias_penalty > MODERATE_BIAS_THRESHOLD {
        BiasLevel::Moderate
    } else {
        BiasLevel::Low
    };

    let sentiment = if positive_hits > negative_hits {
        Sentiment::Positive
    } else if negative_hits > positive_hits {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let safety_flags = if bias_penalty > HIGH_BIAS_THRESHOLD {
        vec!["High bias detected".to_string()]
    } else {
        Vec::new()
    };

    AnalysisResult {
        overall_score: 75u8.saturating_sub(bias_penalty),
        factuality: 70,
        credibility: 65,
        bias_level,
        bias_rationale: "Heuristic analysis - API unavailable".to_string(),
        claims: vec!["Analysis limited without AI service".to_string()],
        sentiment,
        credibility_rationale: "Basic analysis - full assessment unavailable".to_string(),
        safety_flags,
    }
}

fn count_matches(text: &str, words: &[&str]) -> u32 {
    words.iter().filter(|word| text.contains(*word)).count() as u32
}
