use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::auth::AuthUser;
use crate::routes::today;
use crate::services::assistant::{trim_history, AssistantContext, ChatMessage, Reply};
use crate::services::validation::non_blank;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(chat))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// One assistant turn. The conversation lives on the client; only the tail of
/// its history is forwarded.
async fn chat(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<Reply>> {
    let message = non_blank(request.message)
        .ok_or_else(|| AppError::Validation(i18n::t("validation.message_required")))?;

    let assistant = state
        .assistant
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable(i18n::t("chat.assistant_unavailable")))?;

    let context = AssistantContext::load(&state, &user, today(&state)).await?;
    let system_prompt = context.system_prompt()?;
    let history = trim_history(
        &request.conversation_history,
        state.config.assistant.history_limit,
    );

    tracing::debug!(
        "Chat turn for profile {} with {} history messages",
        user.id,
        history.len()
    );
    let reply = assistant.generate(&system_prompt, &history, &message).await?;
    Ok(Json(reply))
}
