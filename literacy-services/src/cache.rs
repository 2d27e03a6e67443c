//! Content-addressed analysis cache
//!
//! Records are keyed by content fingerprint and kept most recent first.
//! The cache holds at most [`MAX_CACHE_SIZE`] records; each record
//! expires [`CACHE_EXPIRY_HOURS`] after creation. Expired records are
//! filtered from every read and purged from storage after writes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use literacy_core::{fingerprint, AnalysisExtras, AnalysisVerdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::{load_versioned, save_versioned, ProfileStorage};

pub const CACHE_KEY: &str = "media_literacy_cache";
const CACHE_SCHEMA_VERSION: u32 = 1;

/// Oldest records are dropped past this count.
pub const MAX_CACHE_SIZE: usize = 50;
pub const CACHE_EXPIRY_HOURS: i64 = 24;

/// One cached analysis, addressed by its content fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAnalysisRecord {
    /// Fingerprint of the analyzed content.
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub analysis: AnalysisVerdict,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extras: AnalysisExtras,
}

/// Point-in-time cache summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total: usize,
    /// Byte length of the serialized cache blob.
    pub size_bytes: usize,
    pub oldest_timestamp: Option<DateTime<Utc>>,
    pub newest_timestamp: Option<DateTime<Utc>>,
}

/// Fingerprint-keyed cache over profile storage.
pub struct AnalysisCache {
    storage: Arc<dyn ProfileStorage>,
}

impl AnalysisCache {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Looks up a live record for this content.
    pub fn get(&self, content: &str) -> Option<CachedAnalysisRecord> {
        self.lookup_at(content, Utc::now())
    }

    fn lookup_at(&self, content: &str, now: DateTime<Utc>) -> Option<CachedAnalysisRecord> {
        let id = fingerprint(content);
        self.records()
            .into_iter()
            .find(|record| record.id == id)
            .filter(|record| !is_expired(record, now))
    }

    /// Inserts a record at the head, replacing any record for the same
    /// content and evicting past the size bound.
    pub fn put(
        &self,
        title: &str,
        content: &str,
        analysis: &AnalysisVerdict,
        url: Option<&str>,
        domain: Option<&str>,
        extras: &AnalysisExtras,
    ) -> CachedAnalysisRecord {
        let record = CachedAnalysisRecord {
            id: fingerprint(content),
            title: title.to_string(),
            content: content.to_string(),
            url: url.map(str::to_string),
            domain: domain.map(str::to_string),
            analysis: analysis.clone(),
            created_at: Utc::now(),
            extras: extras.clone(),
        };

        let mut records = self.records();
        records.retain(|existing| existing.id != record.id);
        records.insert(0, record.clone());
        records.truncate(MAX_CACHE_SIZE);
        self.write(&records);

        record
    }

    /// Drops expired records from storage.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        let mut records = self.records();
        let before = records.len();
        records.retain(|record| !is_expired(record, now));
        if records.len() < before {
            debug!(purged = before - records.len(), "purged expired analyses");
            self.write(&records);
        }
    }

    /// All live records, most recent first.
    pub fn list_all(&self) -> Vec<CachedAnalysisRecord> {
        let now = Utc::now();
        self.records()
            .into_iter()
            .filter(|record| !is_expired(record, now))
            .collect()
    }

    /// Summary over live records.
    pub fn stats(&self) -> CacheStats {
        let size_bytes = self
            .storage
            .get_item(CACHE_KEY)
            .map(|raw| raw.len())
            .unwrap_or(0);

        let records = self.list_all();
        CacheStats {
            total: records.len(),
            size_bytes,
            oldest_timestamp: records.last().map(|record| record.created_at),
            newest_timestamp: records.first().map(|record| record.created_at),
        }
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.storage.remove_item(CACHE_KEY);
    }

    fn records(&self) -> Vec<CachedAnalysisRecord> {
        load_versioned(self.storage.as_ref(), CACHE_KEY, CACHE_SCHEMA_VERSION).unwrap_or_default()
    }

    fn write(&self, records: &[CachedAnalysisRecord]) {
        save_versioned(self.storage.as_ref(), CACHE_KEY, CACHE_SCHEMA_VERSION, &records);
    }
}

fn is_expired(record: &CachedAnalysisRecord, now: DateTime<Utc>) -> bool {
    now >= record.created_at + Duration::hours(CACHE_EXPIRY_HOURS)
}
