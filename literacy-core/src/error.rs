//! Error types for the media literacy pipeline

use thiserror::Error;

/// Pipeline-wide error type
///
/// Only `QuotaExceeded` and `InvalidUrl`/`InvalidInput` are ever surfaced to
/// callers of the analyze pipeline; the remaining variants describe failure
/// modes that degrade to a fallback before reaching the caller.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("analysis quota exceeded: maximum {limit} analyses per session")]
    QuotaExceeded { limit: u32 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("cache corrupt: {0}")]
    CacheCorrupt(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MediaError {
    pub fn quota_exceeded(limit: u32) -> Self {
        MediaError::QuotaExceeded { limit }
    }

    pub fn invalid_url(msg: impl Into<String>) -> Self {
        MediaError::InvalidUrl(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        MediaError::InvalidInput(msg.into())
    }

    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        MediaError::ProviderUnavailable(msg.into())
    }

    pub fn extraction_failed(msg: impl Into<String>) -> Self {
        MediaError::ExtractionFailed(msg.into())
    }

    pub fn cache_corrupt(msg: impl Into<String>) -> Self {
        MediaError::CacheCorrupt(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        MediaError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        MediaError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        MediaError::Internal(msg.into())
    }
}

/// Result type alias for pipeline operations
pub type MediaResult<T> = Result<T, MediaError>;
