//! Recovery policy for AI calls.
//!
//! [`WithFallback`] wraps any backend and decides, per capability, what a
//! failure turns into:
//!
//! | capability      | on failure                                   |
//! |-----------------|----------------------------------------------|
//! | goals           | [`UserGoals::FALLBACK`]                      |
//! | suggestions     | empty list                                   |
//! | text / image    | error is returned so the user can try again  |
//! | chat            | [`CHAT_EMPTY_REPLY`] or [`CHAT_FAILED_REPLY`] |
//!
//! Inputs that cannot produce anything (blank text, one-letter queries) are
//! answered locally without calling the backend.

use async_trait::async_trait;
use tracing::warn;

use super::traits::{ChatService, ChatTurn, EntryParser, ImageInput, PlanGenerator};
use crate::diary::ParsedEntry;
use crate::error::ServiceError;
use crate::profile::{ProfileDraft, UserGoals, UserProfile};

/// Shortest query sent for suggestions.
pub const MIN_SUGGESTION_QUERY: usize = 2;

/// Most suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Reply when the coach answered with nothing.
pub const CHAT_EMPTY_REPLY: &str = "Sorry, try again.";

/// Reply when the coach could not be reached.
pub const CHAT_FAILED_REPLY: &str = "Connection error.";

pub struct WithFallback<S> {
    inner: S,
}

impl<S> WithFallback<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: PlanGenerator> PlanGenerator for WithFallback<S> {
    async fn generate_goals(&self, draft: &ProfileDraft) -> Result<UserGoals, ServiceError> {
        match self.inner.generate_goals(draft).await {
            Ok(goals) => Ok(goals),
            Err(e) => {
                warn!(error = %e, "goal generation failed, using fallback goals");
                Ok(UserGoals::FALLBACK)
            }
        }
    }
}

#[async_trait]
impl<S: EntryParser> EntryParser for WithFallback<S> {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY {
            return Ok(Vec::new());
        }
        match self.inner.suggest(query).await {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                Ok(suggestions)
            }
            Err(e) => {
                warn!(error = %e, "suggestions unavailable");
                Ok(Vec::new())
            }
        }
    }

    async fn parse_text(&self, text: &str) -> Result<Vec<ParsedEntry>, ServiceError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.inner.parse_text(text).await.inspect_err(|e| {
            warn!(error = %e, "text analysis failed");
        })
    }

    async fn parse_image(&self, image: &ImageInput) -> Result<Vec<ParsedEntry>, ServiceError> {
        self.inner.parse_image(image).await.inspect_err(|e| {
            warn!(error = %e, "image analysis failed");
        })
    }
}

#[async_trait]
impl<S: ChatService> ChatService for WithFallback<S> {
    async fn reply(
        &self,
        history: &[ChatTurn],
        message: &str,
        profile: Option<&UserProfile>,
    ) -> Result<String, ServiceError> {
        match self.inner.reply(history, message, profile).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) | Err(ServiceError::EmptyResponse) => Ok(CHAT_EMPTY_REPLY.to_string()),
            Err(e) => {
                warn!(error = %e, "chat failed");
                Ok(CHAT_FAILED_REPLY.to_string())
            }
        }
    }
}
