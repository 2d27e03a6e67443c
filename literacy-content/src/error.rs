//! Error types for the content module

use literacy_core::MediaError;
use thiserror::Error;

/// Errors that can occur while fetching or generating content
#[derive(Debug, Error)]
pub enum ContentError {
    /// The input is not a well-formed http/https URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Video generation did not produce a result
    #[error("Video generation failed: {0}")]
    GenerationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ContentError> for MediaError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::InvalidUrl(msg) => MediaError::InvalidUrl(msg),
            ContentError::InvalidConfig(msg) => MediaError::Config(msg),
            other => MediaError::ExtractionFailed(other.to_string()),
        }
    }
}
