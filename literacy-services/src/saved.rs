//! Saved analyses and notification subscriptions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use literacy_core::MediaAnalysisResponse;
use serde::{Deserialize, Serialize};

use crate::storage::{load_versioned, save_versioned, ProfileStorage};

pub const SAVED_ITEMS_KEY: &str = "media_literacy_saved_items";
pub const SUBSCRIPTIONS_KEY: &str = "media_literacy_notifications";
const SAVED_SCHEMA_VERSION: u32 = 1;
const SUBSCRIPTIONS_SCHEMA_VERSION: u32 = 1;

/// A pinned analysis with its save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    #[serde(flatten)]
    pub item: MediaAnalysisResponse,
    pub saved_at: DateTime<Utc>,
}

/// An update subscription for one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSubscription {
    pub item_id: String,
    pub title: String,
    pub subscribed_at: DateTime<Utc>,
}

/// Pinned analyses, most recently saved first.
pub struct SavedItemsStore {
    storage: Arc<dyn ProfileStorage>,
}

impl SavedItemsStore {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Pins an analysis. Saving an already-pinned id is a no-op, keeping
    /// the earlier save time.
    pub fn save(&self, item: &MediaAnalysisResponse) {
        let mut items = self.list();
        if items.iter().any(|saved| saved.item.id == item.id) {
            return;
        }

        items.insert(
            0,
            SavedItem {
                item: item.clone(),
                saved_at: Utc::now(),
            },
        );
        self.write(&items);
    }

    pub fn list(&self) -> Vec<SavedItem> {
        load_versioned(self.storage.as_ref(), SAVED_ITEMS_KEY, SAVED_SCHEMA_VERSION)
            .unwrap_or_default()
    }

    pub fn delete(&self, item_id: &str) {
        let mut items = self.list();
        items.retain(|saved| saved.item.id != item_id);
        self.write(&items);
    }

    fn write(&self, items: &[SavedItem]) {
        save_versioned(
            self.storage.as_ref(),
            SAVED_ITEMS_KEY,
            SAVED_SCHEMA_VERSION,
            &items,
        );
    }
}

/// Update subscriptions, in subscription order.
pub struct SubscriptionStore {
    storage: Arc<dyn ProfileStorage>,
}

impl SubscriptionStore {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Subscribes to updates for an analysis. Duplicate subscriptions are
    /// ignored.
    pub fn subscribe(&self, item: &MediaAnalysisResponse) {
        let mut subscriptions = self.list();
        if subscriptions.iter().any(|sub| sub.item_id == item.id) {
            return;
        }

        subscriptions.push(NotificationSubscription {
            item_id: item.id.clone(),
            title: item.title.clone(),
            subscribed_at: Utc::now(),
        });
        self.write(&subscriptions);
    }

    pub fn list(&self) -> Vec<NotificationSubscription> {
        load_versioned(
            self.storage.as_ref(),
            SUBSCRIPTIONS_KEY,
            SUBSCRIPTIONS_SCHEMA_VERSION,
        )
        .unwrap_or_default()
    }

    pub fn unsubscribe(&self, item_id: &str) {
        let mut subscriptions = self.list();
        subscriptions.retain(|sub| sub.item_id != item_id);
        self.write(&subscriptions);
    }

    fn write(&self, subscriptions: &[NotificationSubscription]) {
        save_versioned(
            self.storage.as_ref(),
            SUBSCRIPTIONS_KEY,
            SUBSCRIPTIONS_SCHEMA_VERSION,
            &subscriptions,
        );
    }
}

/// Clipboard-ready summary of an analysis.
pub fn share_text(item: &MediaAnalysisResponse) -> String {
    format!(
        "Media Analysis: {}\nCheck out this media bias analysis - {} with {}% credibility.",
        item.title, item.analysis.result.bias_level, item.confidence
    )
}
