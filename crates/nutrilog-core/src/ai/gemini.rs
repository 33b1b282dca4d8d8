//! # Gemini backend
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`).
//! Structured capabilities ask for `application/json` output constrained by a
//! response schema and decode the returned text. Chat sends the history plus
//! a system instruction carrying the user's profile.
//!
//! The API key is read from the environment variable named by
//! `ai.api_key_env` (default `GEMINI_API_KEY`).

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use indoc::formatdoc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;

use super::traits::{ChatRole, ChatService, ChatTurn, EntryParser, ImageInput, PlanGenerator};
use crate::diary::{EntryType, ParsedEntry};
use crate::error::ServiceError;
use crate::profile::{ProfileDraft, UserGoals, UserProfile};
use crate::storage::AiConfig;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl Content {
    fn text(role: Option<&'static str>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

impl GeminiRequest {
    fn structured(contents: Vec<Content>, schema: Value) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

// ============================================================================
// Schemas and prompts
// ============================================================================

fn goals_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories": { "type": "NUMBER" },
            "protein": { "type": "NUMBER" },
            "carbs": { "type": "NUMBER" },
            "fat": { "type": "NUMBER" }
        },
        "required": ["calories", "protein", "carbs", "fat"]
    })
}

fn suggestions_schema() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn entries_schema(types: &[&str]) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "portion": { "type": "STRING" },
                "calories": { "type": "NUMBER" },
                "type": { "type": "STRING", "enum": types },
                "macros": {
                    "type": "OBJECT",
                    "properties": {
                        "protein": { "type": "NUMBER" },
                        "carbs": { "type": "NUMBER" },
                        "fat": { "type": "NUMBER" }
                    },
                    "required": ["protein", "carbs", "fat"]
                }
            },
            "required": ["name", "portion", "calories", "macros", "type"]
        }
    })
}

fn plan_prompt(draft: &ProfileDraft) -> String {
    let (goal_type, direction) = if draft.is_gaining() {
        ("Weight Gain / Muscle Build", "Surplus")
    } else {
        ("Weight Loss", "Deficit")
    };
    formatdoc! {"
        Create a daily nutrition plan for:
        Age: {age}, Gender: {gender}, Height: {ft}ft {inches}in, Weight: {weight}lbs, Goal Weight: {goal}lbs, Activity: {activity}.
        Regimen: {regimen}. Goal: {goal_type} (Target: {rate}lbs/week {direction}).
        Return JSON: {{calories, protein (g), carbs (g), fat (g)}}. Ensure specific numbers suitable for {goal_type}.",
        age = draft.age,
        gender = draft.gender.as_str(),
        ft = draft.height_ft,
        inches = draft.height_in,
        weight = draft.current_weight,
        goal = draft.goal_weight,
        activity = draft.activity_level.as_str(),
        regimen = draft.regimen.as_str(),
        rate = draft.weight_loss_rate,
        goal_type = goal_type,
        direction = direction,
    }
}

fn parse_prompt(text: &str) -> String {
    formatdoc! {r#"
        Parse entry: "{text}".
        If food: type="food", est. calories (TOTAL for quantity), macros.
        If exercise: type="exercise", est. calories burned (positive number), macros=0.
        Return JSON array."#,
        text = text,
    }
}

const IMAGE_PROMPT: &str =
    "Identify food items. Return JSON array: name, portion, total calories, macros. type='food'.";

fn coach_instruction(profile: Option<&UserProfile>) -> String {
    let context = match profile {
        Some(p) => format!(
            "User: {}y, {}, {}lbs (Goal: {}). Regimen: {}.",
            p.age,
            p.gender.as_str(),
            p.current_weight,
            p.goal_weight,
            p.regimen.as_str()
        ),
        None => "User profile not set.".to_string(),
    };
    formatdoc! {"
        You are NutriAI. Context: {context}
        Role: Short, punchy, motivating coach.
        Rules:
        1. Keep answers under 40 words unless explaining a complex topic.
        2. Use **bold** for key terms.
        3. Be positive but direct.
        4. Use Imperial units.",
        context = context,
    }
}

// ============================================================================
// Client
// ============================================================================

/// Gemini-backed implementation of every AI capability.
pub struct GeminiClient {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client with an explicit key and the rest of the settings from
    /// `config`.
    ///
    /// # Errors
    /// Returns [`ServiceError::Request`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, config: &AiConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client reading the key from the configured environment variable.
    ///
    /// # Errors
    /// Returns [`ServiceError::NotConfigured`] if the variable is unset or blank.
    pub fn from_config(config: &AiConfig) -> Result<Self, ServiceError> {
        let api_key = config.api_key().ok_or_else(|| ServiceError::NotConfigured {
            env_var: config.api_key_env.clone(),
        })?;
        Self::new(api_key, config)
    }

    fn endpoint(&self) -> Result<Url, ServiceError> {
        let raw = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&raw, &[("key", self.api_key.as_str())])
            .map_err(|e| ServiceError::Request(format!("invalid endpoint {raw}: {e}")))
    }

    /// Send one request and return the concatenated candidate text.
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &GeminiRequest) -> Result<String, ServiceError> {
        let url = self.endpoint()?;
        debug!("Sending request to Gemini API");

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            ServiceError::Malformed(e.to_string())
        })?;
        if let Some(err) = parsed.error {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: err.message,
            });
        }

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(text)
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        request: &GeminiRequest,
    ) -> Result<T, ServiceError> {
        let text = self.generate(request).await?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    async fn generate_entries(
        &self,
        request: &GeminiRequest,
    ) -> Result<Vec<ParsedEntry>, ServiceError> {
        let entries: Vec<ParsedEntry> = self.generate_json(request).await?;
        for entry in &entries {
            entry
                .validate()
                .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        }
        Ok(entries)
    }
}

#[async_trait]
impl PlanGenerator for GeminiClient {
    async fn generate_goals(&self, draft: &ProfileDraft) -> Result<UserGoals, ServiceError> {
        let request = GeminiRequest::structured(
            vec![Content::text(None, plan_prompt(draft))],
            goals_schema(),
        );
        let goals: UserGoals = self.generate_json(&request).await?;
        if !(goals.calories.is_finite() && goals.calories > 0.0) {
            return Err(ServiceError::Malformed(format!(
                "calorie goal must be positive, got {}",
                goals.calories
            )));
        }
        Ok(goals)
    }
}

#[async_trait]
impl EntryParser for GeminiClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        let prompt =
            format!("Suggest 5 common foods or exercises matching \"{query}\". Concise JSON array only.");
        let request =
            GeminiRequest::structured(vec![Content::text(None, prompt)], suggestions_schema());
        self.generate_json(&request).await
    }

    async fn parse_text(&self, text: &str) -> Result<Vec<ParsedEntry>, ServiceError> {
        let request = GeminiRequest::structured(
            vec![Content::text(None, parse_prompt(text))],
            entries_schema(&["food", "exercise"]),
        );
        self.generate_entries(&request).await
    }

    async fn parse_image(&self, image: &ImageInput) -> Result<Vec<ParsedEntry>, ServiceError> {
        let content = Content {
            role: None,
            parts: vec![
                Part::Inline {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text {
                    text: IMAGE_PROMPT.to_string(),
                },
            ],
        };
        let request = GeminiRequest::structured(vec![content], entries_schema(&["food"]));
        let mut entries = self.generate_entries(&request).await?;
        for entry in &mut entries {
            entry.entry_type = EntryType::Food;
        }
        Ok(entries)
    }
}

#[async_trait]
impl ChatService for GeminiClient {
    async fn reply(
        &self,
        history: &[ChatTurn],
        message: &str,
        profile: Option<&UserProfile>,
    ) -> Result<String, ServiceError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                Content::text(Some(role), turn.text.clone())
            })
            .collect();
        contents.push(Content::text(Some("user"), message));

        let request = GeminiRequest {
            contents,
            system_instruction: Some(Content::text(None, coach_instruction(profile))),
            generation_config: None,
        };
        self.generate(&request).await
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
