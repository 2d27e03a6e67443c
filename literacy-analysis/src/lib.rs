//! Credibility analysis for the media literacy pipeline
//!
//! This crate wraps the Gemini analysis provider behind a per-session call
//! quota, with a keyword heuristic that stands in whenever the provider
//! fails, plus audience-targeted plain-language rewrites of analyzed
//! content.

pub mod heuristic;
pub mod provider;
pub mod rewrite;
pub mod session;

pub use heuristic::heuristic_analysis;
pub use provider::{AnalysisProvider, ProviderConfig};
pub use rewrite::{generate_rewrite, GenerationalContent};
pub use session::{Session, MAX_CALLS_PER_SESSION};
