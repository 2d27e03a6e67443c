//! Core types for the media literacy analysis pipeline
//!
//! This crate defines the shared data structures used across the pipeline:
//! the analysis result model, the unified response envelope, extraction
//! records, and the content fingerprint that keys the cache.

pub mod error;
pub mod fingerprint;
pub mod text;
pub mod types;

pub use error::{MediaError, MediaResult};
pub use fingerprint::fingerprint;
pub use text::clip_to_boundary;
pub use types::{
    AnalysisExtras, AnalysisKind, AnalysisResult, AnalysisVerdict, BiasLevel, ExtractedContent,
    MediaAnalysisResponse, Sentiment,
};
