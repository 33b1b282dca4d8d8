//! Community feed posts.
//!
//! The feed is a newest-first list. A fresh installation is seeded with a
//! couple of example posts so the feed is never empty.

use serde::{Deserialize, Serialize};

use crate::clock::HOUR_MS;
use crate::error::ValidationError;
use crate::events::Event;
use crate::profile::avatar_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Milestone,
    Meal,
    Question,
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub likes: u32,
    pub comments: u32,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub is_liked: bool,
}

impl CommunityPost {
    /// A status update by the local user.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyText`] for blank content.
    pub fn status(author: &str, content: &str, now_ms: i64) -> Result<Self, ValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyText("content".into()));
        }
        let author = if author.trim().is_empty() { "Me" } else { author };
        Ok(Self {
            id: now_ms.to_string(),
            author: author.to_string(),
            author_avatar: Some(avatar_for(author)),
            content: content.to_string(),
            post_type: PostType::Status,
            image: None,
            likes: 0,
            comments: 0,
            timestamp: now_ms,
            is_liked: false,
        })
    }

    fn toggle_like(&mut self) {
        if self.is_liked {
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.likes += 1;
        }
        self.is_liked = !self.is_liked;
    }
}

/// Posts written to an empty feed, timestamped relative to `now_ms`.
pub fn seed_posts(now_ms: i64) -> Vec<CommunityPost> {
    vec![
        CommunityPost {
            id: "p1".into(),
            author: "Sarah Jenkins".into(),
            author_avatar: Some(avatar_for("Sarah")),
            content: "Finally broke through my plateau! Down 2lbs this week thanks to the high protein plan. 💪".into(),
            post_type: PostType::Milestone,
            image: None,
            likes: 24,
            comments: 5,
            timestamp: now_ms - HOUR_MS,
            is_liked: false,
        },
        CommunityPost {
            id: "p2".into(),
            author: "Mike Chen".into(),
            author_avatar: Some(avatar_for("Mike")),
            content: "Just tried this amazing quinoa bowl. The AI analysis was spot on with the macros.".into(),
            post_type: PostType::Meal,
            image: None,
            likes: 12,
            comments: 2,
            timestamp: now_ms - 2 * HOUR_MS,
            is_liked: false,
        },
    ]
}

/// Flip the like flag of the post with `id`. Unknown ids change nothing.
pub fn toggle_like(posts: &mut [CommunityPost], id: &str) -> Option<Event> {
    let post = posts.iter_mut().find(|p| p.id == id)?;
    post.toggle_like();
    Some(Event::PostLikeToggled {
        id: post.id.clone(),
        liked: post.is_liked,
        likes: post.likes,
    })
}

/// "5m ago", "3h ago", or the calendar date for anything older than a day.
pub fn relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms - timestamp_ms;
    if diff < HOUR_MS {
        format!("{}m ago", diff.max(0) / 60_000)
    } else if diff < 24 * HOUR_MS {
        format!("{}h ago", diff / HOUR_MS)
    } else {
        crate::clock::from_ms(timestamp_ms, &chrono::Local)
            .map(|dt| crate::clock::date_key(dt.date_naive()))
            .unwrap_or_default()
    }
}
