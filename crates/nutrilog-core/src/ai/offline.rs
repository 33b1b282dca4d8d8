use async_trait::async_trait;

use super::traits::{ChatService, ChatTurn, EntryParser, ImageInput, PlanGenerator};
use crate::diary::ParsedEntry;
use crate::error::ServiceError;
use crate::profile::{ProfileDraft, UserGoals, UserProfile};

/// Backend used when no API key is configured. Every call fails with
/// [`ServiceError::NotConfigured`], so the fallback policy decides the outcome.
#[derive(Debug, Clone)]
pub struct OfflineService {
    env_var: String,
}

impl OfflineService {
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    fn unavailable<T>(&self) -> Result<T, ServiceError> {
        Err(ServiceError::NotConfigured {
            env_var: self.env_var.clone(),
        })
    }
}

#[async_trait]
impl PlanGenerator for OfflineService {
    async fn generate_goals(&self, _draft: &ProfileDraft) -> Result<UserGoals, ServiceError> {
        self.unavailable()
    }
}

#[async_trait]
impl EntryParser for OfflineService {
    async fn suggest(&self, _query: &str) -> Result<Vec<String>, ServiceError> {
        self.unavailable()
    }

    async fn parse_text(&self, _text: &str) -> Result<Vec<ParsedEntry>, ServiceError> {
        self.unavailable()
    }

    async fn parse_image(&self, _image: &ImageInput) -> Result<Vec<ParsedEntry>, ServiceError> {
        self.unavailable()
    }
}

#[async_trait]
impl ChatService for OfflineService {
    async fn reply(
        &self,
        _history: &[ChatTurn],
        _message: &str,
        _profile: Option<&UserProfile>,
    ) -> Result<String, ServiceError> {
        self.unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_reports_missing_key() {
        let offline = OfflineService::new("GEMINI_API_KEY");
        let err = offline.parse_text("an apple").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotConfigured {
                env_var: "GEMINI_API_KEY".into()
            }
        );
        assert!(offline.suggest("apple").await.is_err());
        assert!(offline.reply(&[], "hello", None).await.is_err());
    }
}
