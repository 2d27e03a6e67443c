//! Profile services for the media literacy pipeline
//!
//! Storage-backed stores (analysis cache, saved items, quiz progress,
//! discussions) plus the orchestrator joining extraction, caching, and
//! provider analysis into one analyze flow.

pub mod cache;
pub mod discussions;
pub mod game;
pub mod orchestrator;
pub mod saved;
pub mod storage;

pub use cache::{AnalysisCache, CacheStats, CachedAnalysisRecord};
pub use discussions::{DiscussionPost, DiscussionStore, Reply};
pub use game::{GameProgress, GameProgressStore, TreeStage, DAILY_QUIZ_LIMIT};
pub use orchestrator::{AnalysisOrchestrator, AnalyzeRequest};
pub use saved::{share_text, NotificationSubscription, SavedItem, SavedItemsStore, SubscriptionStore};
pub use storage::{clear_all_data, FileStorage, MemoryStorage, ProfileStorage};
