//! End-to-end analysis pipeline
//!
//! Joins extraction, the cache, and the provider into one flow. Cache
//! hits keep their original analysis and timestamp and cost no session
//! quota. The only errors surfaced are a malformed source URL and quota
//! exhaustion; everything else degrades inside the pipeline.

use std::sync::Arc;

use literacy_analysis::AnalysisProvider;
use literacy_content::{ContentError, ContentExtractor};
use literacy_core::{fingerprint, AnalysisExtras, MediaAnalysisResponse, MediaResult};
use tracing::{debug, instrument, warn};

use crate::cache::{AnalysisCache, CacheStats};

/// One analysis request.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub title: String,
    pub content: String,
    /// Caller-supplied media category ("article", "video", ...).
    pub media_type: String,
    /// When set, content is fetched from this URL before analysis.
    pub source_url: Option<String>,
}

/// Pipeline facade over extractor, cache, and provider.
pub struct AnalysisOrchestrator {
    cache: Arc<AnalysisCache>,
    provider: Arc<AnalysisProvider>,
    extractor: Arc<ContentExtractor>,
}

impl AnalysisOrchestrator {
    pub fn new(
        cache: Arc<AnalysisCache>,
        provider: Arc<AnalysisProvider>,
        extractor: Arc<ContentExtractor>,
    ) -> Self {
        Self {
            cache,
            provider,
            extractor,
        }
    }

    /// Runs the full pipeline for one request.
    #[instrument(skip(self, request), fields(media_type = %request.media_type))]
    pub async fn analyze(&self, request: &AnalyzeRequest) -> MediaResult<MediaAnalysisResponse> {
        let mut title = request.title.clone();
        let mut content = request.content.clone();
        let mut url = request.source_url.clone();
        let mut domain: Option<String> = None;
        let mut extras = AnalysisExtras::default();

        if let Some(source_url) = request.source_url.as_deref() {
            match self.extractor.extract(source_url).await {
                Ok(extracted) => {
                    title = extracted.title;
                    content = extracted.content;
                    url = Some(extracted.url);
                    domain = Some(extracted.domain);
                    extras = extracted.extras;
                }
                Err(err @ ContentError::InvalidUrl(_)) => return Err(err.into()),
                Err(err) => {
                    warn!(error = %err, "extraction failed, analyzing the supplied text");
                }
            }
        }

        if let Some(hit) = self.cache.get(&content) {
            debug!(id = %hit.id, "serving analysis from cache");
            return Ok(MediaAnalysisResponse {
                id: hit.id,
                title: hit.title,
                content: hit.content,
                url: hit.url,
                domain: hit.domain,
                bias_score: hit.analysis.result.overall_score,
                confidence: hit.analysis.result.credibility,
                source_url: url,
                media_type: request.media_type.clone(),
                analysis: hit.analysis,
                timestamp: hit.created_at,
                extras: hit.extras,
            });
        }

        let verdict = self.provider.analyze(&title, &content, url.as_deref()).await?;

        let record = self.cache.put(
            &title,
            &content,
            &verdict,
            url.as_deref(),
            domain.as_deref(),
            &extras,
        );
        self.cache.purge_expired();

        Ok(MediaAnalysisResponse {
            id: fingerprint(&content),
            title,
            content,
            url: url.clone(),
            domain,
            bias_score: verdict.result.overall_score,
            confidence: verdict.result.credibility,
            source_url: url,
            media_type: request.media_type.clone(),
            analysis: verdict,
            timestamp: record.created_at,
            extras,
        })
    }

    /// Provider calls left in the current session.
    pub fn calls_remaining(&self) -> u32 {
        self.provider.calls_remaining()
    }

    /// Summary of the analysis cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
