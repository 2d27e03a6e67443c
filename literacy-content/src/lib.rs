//! Content acquisition for the media literacy pipeline
//!
//! This crate covers the three content surfaces: article extraction from
//! URLs, related-video search, and explainer-video generation.

pub mod error;
pub mod extractor;
pub mod video_gen;
pub mod video_search;

pub use error::ContentError;
pub use extractor::{ContentExtractor, ExtractorConfig};
pub use video_gen::{
    build_video_prompt, AspectRatio, VideoGenConfig, VideoGenerationParams, VideoGenerator,
};
pub use video_search::{generate_search_query, RelatedVideo, VideoSearchClient, VideoSearchConfig};
