use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::time_range::week_range;
use crate::config::AssistantConfig;
use crate::db::{
    InventoryItem, InventoryRepository, ProfessorRepository, ProfessorWithSchedules,
    RecurringSchedule, ScheduleRepository, Shift, ShiftRepository, UserProfile,
};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub message: String,
    pub usage: Option<serde_json::Value>,
}

/// Hosted language model used by the chat endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_context: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> AppResult<Reply>;
}

/// The last `limit` messages, with any client-supplied system messages removed.
pub fn trim_history(history: &[ChatMessage], limit: usize) -> Vec<ChatMessage> {
    let kept: Vec<&ChatMessage> = history
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .collect();
    let skip = kept.len().saturating_sub(limit);
    kept.into_iter().skip(skip).cloned().collect()
}

// ============================================================================
// OpenRouter client
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    app_url: String,
    app_title: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenRouterClient {
    pub fn new(config: &AssistantConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OPENROUTER_API_KEY is not set"))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// Pull the reply text and usage out of a chat-completions response body.
pub fn parse_completion(body: &serde_json::Value) -> Reply {
    let message = body["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| i18n::t("chat.empty_reply"));

    Reply {
        message,
        usage: body.get("usage").filter(|u| !u.is_null()).cloned(),
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn generate(
        &self,
        system_context: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> AppResult<Reply> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::new(ChatRole::System, system_context));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::new(ChatRole::User, message));

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_title)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Assistant(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(parse_completion(&body))
    }
}

// ============================================================================
// Context snapshot
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AssistantContext {
    pub inventory: Vec<InventoryItem>,
    pub professors: Vec<ProfessorWithSchedules>,
    pub schedules: Vec<RecurringSchedule>,
    pub week_shifts: Vec<Shift>,
    pub user: ContextUser,
}

#[derive(Debug, Serialize)]
pub struct ContextUser {
    pub email: String,
    pub role: String,
}

impl AssistantContext {
    /// Snapshot of the data the assistant may answer about.
    pub async fn load(
        state: &Arc<AppState>,
        user: &UserProfile,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let week = week_range(today);
        let (inventory, professors, schedules, week_shifts) = futures::try_join!(
            InventoryRepository::list(&state.db),
            ProfessorRepository::list_with_schedules(&state.db),
            ScheduleRepository::list_all(&state.db),
            ShiftRepository::find_in_range(&state.db, week.start, week.end),
        )?;

        Ok(Self {
            inventory,
            professors,
            schedules,
            week_shifts,
            user: ContextUser {
                email: user.email.clone(),
                role: user.role().as_str().to_string(),
            },
        })
    }

    pub fn system_prompt(&self) -> AppResult<String> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize context: {}", e)))?;
        Ok(format!(
            "Sos el asistente del sistema de gestión de {}. \
             Respondé en español usando solo los datos siguientes; \
             si algo no está en los datos, decilo.\n\nDATOS:\n{}",
            i18n::t("app.name"),
            data
        ))
    }
}
