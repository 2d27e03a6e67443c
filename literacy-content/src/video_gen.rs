//! Explainer-video generation via a prediction API
//!
//! Creates a prediction for the video model and polls it to completion.
//! Generation is an opt-in surface: without an API token the generator
//! reports itself unconfigured and fails fast, before any network call.

use std::time::Duration;

use literacy_core::{clip_to_boundary, AnalysisResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::ContentError;

const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";
const MODEL: &str = "minimax/video-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Polling stops after this many attempts (two minutes at the poll interval)
const MAX_POLL_ATTEMPTS: u32 = 60;

/// Content prefix quoted inside the generated prompt
const PROMPT_STORY_LIMIT: usize = 200;

/// Output frame shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
}

/// Parameters for one generation run
#[derive(Debug, Clone)]
pub struct VideoGenerationParams {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    /// Clip length in seconds
    pub duration: u32,
}

impl VideoGenerationParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            duration: 6,
        }
    }
}

/// Configuration for the video generator
#[derive(Debug, Clone)]
pub struct VideoGenConfig {
    pub api_token: Option<String>,
    pub api_base: String,
}

impl VideoGenConfig {
    /// Read the optional token from the `REPLICATE_API_TOKEN` environment
    /// variable
    pub fn from_env() -> Self {
        Self {
            api_token: std::env::var("REPLICATE_API_TOKEN").ok(),
            ..Self::default()
        }
    }

    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            ..Self::default()
        }
    }
}

impl Default for VideoGenConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Client for the video prediction API
pub struct VideoGenerator {
    client: Client,
    config: VideoGenConfig,
}

impl VideoGenerator {
    pub fn new(config: VideoGenConfig) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ContentError::RequestFailed(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// True when an API token is available
    pub fn is_configured(&self) -> bool {
        self.config.api_token.is_some()
    }

    /// Generate a video and return its output URL
    #[instrument(skip(self, params))]
    pub async fn generate_video(&self, params: &VideoGenerationParams) -> Result<String, ContentError> {
        let token = self.config.api_token.as_deref().ok_or_else(|| {
            ContentError::InvalidConfig("video generation API token not configured".to_string())
        })?;

        let mut prediction = self.create_prediction(token, params).await?;

        for _ in 0..MAX_POLL_ATTEMPTS {
            match prediction.status.as_str() {
                "succeeded" => return extract_output(prediction.output),
                "failed" | "canceled" => {
                    let reason = match prediction.error {
                        Some(Value::String(message)) => message,
                        Some(other) => other.to_string(),
                        None => "prediction did not succeed".to_string(),
                    };
                    warn!(reason = %reason, "video prediction failed");
                    return Err(ContentError::GenerationFailed(reason));
                }
                _ => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    prediction = self.poll_prediction(token, &prediction).await?;
                }
            }
        }

        Err(ContentError::GenerationFailed(
            "timed out waiting for the prediction to finish".to_string(),
        ))
    }

    async fn create_prediction(
        &self,
        token: &str,
        params: &VideoGenerationParams,
    ) -> Result<Prediction, ContentError> {
        let url = format!("{}/models/{}/predictions", self.config.api_base, MODEL);

        let request = PredictionRequest {
            input: PredictionInput {
                prompt: &params.prompt,
                aspect_ratio: params.aspect_ratio,
                duration: params.duration,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ContentError::RequestFailed(e.to_string()))?;

        read_prediction(response).await
    }

    async fn poll_prediction(
        &self,
        token: &str,
        prediction: &Prediction,
    ) -> Result<Prediction, ContentError> {
        let url = prediction
            .urls
            .as_ref()
            .and_then(|urls| urls.get.clone())
            .unwrap_or_else(|| format!("{}/predictions/{}", self.config.api_base, prediction.id));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ContentError::RequestFailed(e.to_string()))?;

        read_prediction(response).await
    }
}

async fn read_prediction(response: reqwest::Response) -> Result<Prediction, ContentError> {
    if !response.status().is_success() {
        return Err(ContentError::ApiError {
            status: response.status().as_u16(),
            message: "prediction API returned an error".to_string(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ContentError::ParseError(e.to_string()))
}

#[derive(Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    aspect_ratio: AspectRatio,
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

/// Pull the output URL out of the prediction's loose output field
///
/// Accepts a bare string, the first string of an array, or an object with
/// a `url` member.
fn extract_output(output: Option<Value>) -> Result<String, ContentError> {
    match output {
        Some(Value::String(url)) => Ok(url),
        Some(Value::Array(items)) => items
            .into_iter()
            .find_map(|item| match item {
                Value::String(url) => Some(url),
                _ => None,
            })
            .ok_or_else(|| {
                ContentError::ParseError("prediction output array held no URL".to_string())
            }),
        Some(Value::Object(mut map)) => match map.remove("url") {
            Some(Value::String(url)) => Ok(url),
            _ => Err(ContentError::ParseError(
                "prediction output object held no URL".to_string(),
            )),
        },
        _ => Err(ContentError::ParseError(
            "unexpected prediction output format".to_string(),
        )),
    }
}

/// Build the news-anchor briefing prompt for a generated explainer
pub fn build_video_prompt(title: &str, content: &str, analysis: &AnalysisResult) -> String {
    let summary = clip_to_boundary(content, PROMPT_STORY_LIMIT);
    let credibility = analysis.credibility;
    let bias_level = analysis.bias_level;
    let sentiment = analysis.sentiment;

    let claims_line = if analysis.claims.is_empty() {
        String::new()
    } else {
        let listed = analysis
            .claims
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        format!("- Key claims: {listed}")
    };

    format!(
        r#"Create a professional news analysis video explaining: "{title}".

Key points to cover:
- Main story: {summary}...
- Credibility rating: {credibility}% reliable
- Bias level: {bias_level}
- Sentiment: {sentiment}
{claims_line}

Style: Professional news anchor presentation with clear explanations, visual graphics showing credibility scores and bias analysis. Make it informative and engaging for media literacy education."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use literacy_core::{BiasLevel, Sentiment};
    use serde_json::json;

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            overall_score: 80,
            factuality: 75,
            credibility: 77,
            bias_level: BiasLevel::Low,
            bias_rationale: "Balanced".to_string(),
            claims: vec![
                "First claim".to_string(),
                "Second claim".to_string(),
                "Third claim".to_string(),
                "Fourth claim".to_string(),
            ],
            sentiment: Sentiment::Positive,
            credibility_rationale: "Sourced".to_string(),
            safety_flags: vec![],
        }
    }

    #[test]
    fn prompt_embeds_the_analysis_fields() {
        let content = "b".repeat(300);
        let prompt = build_video_prompt("Big story", &content, &sample_analysis());

        assert!(prompt.contains("explaining: \"Big story\""));
        assert!(prompt.contains(&format!("- Main story: {}...", "b".repeat(200))));
        assert!(prompt.contains("- Credibility rating: 77% reliable"));
        assert!(prompt.contains("- Bias level: Low Bias"));
        assert!(prompt.contains("- Sentiment: Positive"));
        assert!(prompt.contains("- Key claims: First claim, Second claim, Third claim"));
        assert!(!prompt.contains("Fourth claim"));
    }

    #[test]
    fn prompt_omits_the_claims_line_when_there_are_none() {
        let mut analysis = sample_analysis();
        analysis.claims.clear();

        let prompt = build_video_prompt("Big story", "Body", &analysis);
        assert!(!prompt.contains("Key claims"));
    }

    #[test]
    fn output_extraction_accepts_each_known_shape() {
        let direct = extract_output(Some(json!("https://cdn.example.com/video.mp4"))).unwrap();
        assert_eq!(direct, "https://cdn.example.com/video.mp4");

        let first = extract_output(Some(json!([null, "https://cdn.example.com/a.mp4"]))).unwrap();
        assert_eq!(first, "https://cdn.example.com/a.mp4");

        let object =
            extract_output(Some(json!({ "url": "https://cdn.example.com/b.mp4" }))).unwrap();
        assert_eq!(object, "https://cdn.example.com/b.mp4");

        assert!(extract_output(Some(json!(42))).is_err());
        assert!(extract_output(None).is_err());
    }

    #[test]
    fn aspect_ratios_serialize_to_their_labels() {
        assert_eq!(
            serde_json::to_value(AspectRatio::Widescreen).unwrap(),
            "16:9"
        );
        assert_eq!(serde_json::to_value(AspectRatio::Portrait).unwrap(), "9:16");
        assert_eq!(serde_json::to_value(AspectRatio::Square).unwrap(), "1:1");
    }

    #[tokio::test]
    async fn unconfigured_generator_fails_before_any_request() {
        let generator = VideoGenerator::new(VideoGenConfig::default()).unwrap();
        assert!(!generator.is_configured());

        let err = generator
            .generate_video(&VideoGenerationParams::new("A prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn unreachable_api_surfaces_a_request_error() {
        let config = VideoGenConfig {
            api_token: Some("test-token".to_string()),
            api_base: "http://127.0.0.1:9".to_string(),
        };
        let generator = VideoGenerator::new(config).unwrap();
        assert!(generator.is_configured());

        let err = generator
            .generate_video(&VideoGenerationParams::new("A prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::RequestFailed(_)));
    }
}
