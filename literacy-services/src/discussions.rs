//! Community discussion board

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use literacy_core::{MediaError, MediaResult};
use serde::{Deserialize, Serialize};

use crate::storage::{load_versioned, save_versioned, ProfileStorage};

pub const DISCUSSIONS_KEY: &str = "discussions";
const DISCUSSIONS_SCHEMA_VERSION: u32 = 1;

/// A reply on a discussion post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// A discussion post, newest first in the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPost {
    /// Millisecond timestamp at creation; seed posts use small fixed ids.
    pub id: i64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub likes: u32,
    pub comments: u32,
    pub is_user_post: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

/// Storage-backed discussion board.
pub struct DiscussionStore {
    storage: Arc<dyn ProfileStorage>,
}

impl DiscussionStore {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// All posts. Missing or unreadable state seeds the default board.
    pub fn list(&self) -> Vec<DiscussionPost> {
        load_versioned(self.storage.as_ref(), DISCUSSIONS_KEY, DISCUSSIONS_SCHEMA_VERSION)
            .unwrap_or_else(default_discussions)
    }

    /// Posts authored from this profile.
    pub fn user_posts(&self) -> Vec<DiscussionPost> {
        self.list()
            .into_iter()
            .filter(|post| post.is_user_post)
            .collect()
    }

    /// Publishes a post to the top of the board.
    pub fn create(
        &self,
        title: &str,
        description: &str,
        category: &str,
        image: Option<String>,
    ) -> MediaResult<DiscussionPost> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(MediaError::invalid_input(
                "discussion posts need a title and a description",
            ));
        }

        let now = Utc::now();
        let post = DiscussionPost {
            id: now.timestamp_millis(),
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            author: "You".to_string(),
            likes: 0,
            comments: 0,
            is_user_post: true,
            image,
            replies: Vec::new(),
            created_at: now,
        };

        let mut posts = self.list();
        posts.insert(0, post.clone());
        self.write(&posts);

        Ok(post)
    }

    /// Appends a reply and bumps the post's comment count.
    pub fn add_reply(&self, post_id: i64, text: &str) -> MediaResult<Reply> {
        if text.trim().is_empty() {
            return Err(MediaError::invalid_input("replies need text"));
        }

        let mut posts = self.list();
        let post = posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| MediaError::invalid_input(format!("no discussion with id {post_id}")))?;

        let now = Utc::now();
        let reply = Reply {
            id: now.timestamp_millis(),
            text: text.to_string(),
            author: "You".to_string(),
            created_at: now,
        };
        post.replies.push(reply.clone());
        post.comments += 1;
        self.write(&posts);

        Ok(reply)
    }

    fn write(&self, posts: &[DiscussionPost]) {
        save_versioned(
            self.storage.as_ref(),
            DISCUSSIONS_KEY,
            DISCUSSIONS_SCHEMA_VERSION,
            &posts,
        );
    }
}

/// Seed posts shown before any profile activity.
fn default_discussions() -> Vec<DiscussionPost> {
    let now = Utc::now();
    vec![
        DiscussionPost {
            id: 1,
            category: "Video Analysis".to_string(),
            title: "How to identify deepfakes in political videos?".to_string(),
            description: "With the rise of AI-generated content, what are the key indicators \
                          we should look for when evaluating political video content?"
                .to_string(),
            author: "Sarah Chen".to_string(),
            likes: 45,
            comments: 23,
            is_user_post: false,
            image: None,
            replies: Vec::new(),
            created_at: now - Duration::hours(2),
        },
        DiscussionPost {
            id: 2,
            category: "Text Analysis".to_string(),
            title: "Bias detection in news headlines".to_string(),
            description: "I noticed some patterns in how different news outlets frame the same \
                          story. Anyone else exploring bias detection techniques?"
                .to_string(),
            author: "Mike Rodriguez".to_string(),
            likes: 32,
            comments: 18,
            is_user_post: false,
            image: None,
            replies: Vec::new(),
            created_at: now - Duration::hours(4),
        },
        DiscussionPost {
            id: 3,
            category: "Media Analysis".to_string(),
            title: "Understanding source credibility in digital age".to_string(),
            description: "How do we evaluate the credibility of online sources when traditional \
                          gatekeepers are no longer the only option?"
                .to_string(),
            author: "You".to_string(),
            likes: 28,
            comments: 15,
            is_user_post: true,
            image: None,
            replies: Vec::new(),
            created_at: now - Duration::days(1),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> DiscussionStore {
        DiscussionStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn an_empty_board_serves_the_seed_posts() {
        let posts = store().list();

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].author, "Sarah Chen");
        assert_eq!(posts[1].title, "Bias detection in news headlines");
        assert!(posts[2].is_user_post);
    }

    #[test]
    fn corrupt_state_falls_back_to_the_seed_posts() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(DISCUSSIONS_KEY, "not json at all");
        let store = DiscussionStore::new(storage);

        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn new_posts_are_prepended_and_persisted() {
        let store = store();

        let post = store
            .create(
                "Spotting satire",
                "How do you tell satire from misinformation?",
                "Text Analysis",
                None,
            )
            .unwrap();

        let posts = store.list();
        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0].id, post.id);
        assert_eq!(posts[0].author, "You");
        assert!(posts[0].is_user_post);
        assert_eq!(posts[0].comments, 0);
    }

    #[test]
    fn blank_posts_are_rejected() {
        let store = store();

        let err = store.create("  ", "A description", "General", None).unwrap_err();
        assert!(matches!(err, MediaError::InvalidInput(_)));

        let err = store.create("A title", "\t", "General", None).unwrap_err();
        assert!(matches!(err, MediaError::InvalidInput(_)));
    }

    #[test]
    fn replies_append_and_bump_the_comment_count() {
        let store = store();

        let reply = store.add_reply(2, "Same here, framing shifts per outlet.").unwrap();

        let posts = store.list();
        let post = posts.iter().find(|post| post.id == 2).unwrap();
        assert_eq!(post.comments, 19);
        assert_eq!(post.replies.len(), 1);
        assert_eq!(post.replies[0].id, reply.id);
        assert_eq!(post.replies[0].author, "You");
    }

    #[test]
    fn replies_to_unknown_posts_are_rejected() {
        let store = store();

        assert!(store.add_reply(999, "Hello?").is_err());
        assert!(store.add_reply(2, "   ").is_err());
    }

    #[test]
    fn user_posts_filters_to_profile_authored_posts() {
        let store = store();
        store
            .create("My question", "What sources do you trust?", "General", None)
            .unwrap();

        let mine = store.user_posts();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|post| post.is_user_post));
    }
}
