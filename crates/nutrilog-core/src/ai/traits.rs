use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::diary::ParsedEntry;
use crate::error::ServiceError;
use crate::profile::{ProfileDraft, UserGoals, UserProfile};

/// Who said a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A photo to analyse, held as base64.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64 payload without any `data:` prefix.
    pub data: String,
}

impl ImageInput {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Accepts either a bare base64 string or a `data:<mime>;base64,<data>`
    /// URL. Bare strings are assumed to be JPEG.
    pub fn from_data_url(value: &str) -> Self {
        match value.split_once("base64,") {
            Some((prefix, data)) => {
                let mime_type = prefix
                    .strip_prefix("data:")
                    .map(|p| p.trim_end_matches(';'))
                    .filter(|p| !p.is_empty())
                    .unwrap_or("image/jpeg");
                Self {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                }
            }
            None => Self {
                mime_type: "image/jpeg".into(),
                data: value.to_string(),
            },
        }
    }

    /// `data:` URL form, as stored on a logged item or an uploaded avatar.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Turns profile attributes into daily intake targets.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate_goals(&self, draft: &ProfileDraft) -> Result<UserGoals, ServiceError>;
}

/// Turns free text or photos into loggable drafts.
#[async_trait]
pub trait EntryParser: Send + Sync {
    /// Up to five food or exercise names matching a partial query.
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ServiceError>;

    async fn parse_text(&self, text: &str) -> Result<Vec<ParsedEntry>, ServiceError>;

    /// Every returned entry is food.
    async fn parse_image(&self, image: &ImageInput) -> Result<Vec<ParsedEntry>, ServiceError>;
}

/// The nutrition coach.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn reply(
        &self,
        history: &[ChatTurn],
        message: &str,
        profile: Option<&UserProfile>,
    ) -> Result<String, ServiceError>;
}

/// A backend providing every capability.
pub trait AiService: PlanGenerator + EntryParser + ChatService {}

impl<T: PlanGenerator + EntryParser + ChatService + ?Sized> AiService for T {}

#[async_trait]
impl<T: PlanGenerator + ?Sized> PlanGenerator for Box<T> {
    async fn generate_goals(&self, draft: &ProfileDraft) -> Result<UserGoals, ServiceError> {
        (**self).generate_goals(draft).await
    }
}

#[async_trait]
impl<T: EntryParser + ?Sized> EntryParser for Box<T> {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        (**self).suggest(query).await
    }

    async fn parse_text(&self, text: &str) -> Result<Vec<ParsedEntry>, ServiceError> {
        (**self).parse_text(text).await
    }

    async fn parse_image(&self, image: &ImageInput) -> Result<Vec<ParsedEntry>, ServiceError> {
        (**self).parse_image(image).await
    }
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Box<T> {
    async fn reply(
        &self,
        history: &[ChatTurn],
        message: &str,
        profile: Option<&UserProfile>,
    ) -> Result<String, ServiceError> {
        (**self).reply(history, message, profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_prefix_is_stripped() {
        let image = ImageInput::from_data_url("data:image/png;base64,iVBORw0K");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0K");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn bare_base64_is_jpeg() {
        let image = ImageInput::from_data_url("/9j/4AAQ");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "/9j/4AAQ");
    }

    #[test]
    fn bytes_are_encoded() {
        let image = ImageInput::from_bytes(b"hi", "image/jpeg");
        assert_eq!(image.data, "aGk=");
    }
}
