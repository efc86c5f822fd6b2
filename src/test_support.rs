//! Shared fixtures for handler and service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::db::{self, ProfileRepository, UserProfile, UserRole};
use crate::error::AppResult;
use crate::services::assistant::{ChatMessage, Reply, TextGenerator};
use crate::services::auth::AuthService;
use crate::AppState;

pub const TEST_PASSWORD: &str = "secreto1";

fn test_config() -> Config {
    let mut config = Config::default();
    config.jwt.secret = "test-secret".to_string();
    config
}

pub async fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        db: db::test_pool().await,
        config: test_config(),
        assistant: None,
    })
}

pub async fn test_state_with_assistant(assistant: Arc<dyn TextGenerator>) -> Arc<AppState> {
    Arc::new(AppState {
        db: db::test_pool().await,
        config: test_config(),
        assistant: Some(assistant),
    })
}

/// Create a profile with [`TEST_PASSWORD`] and return it with a signed token.
pub async fn signed_in(state: &Arc<AppState>, email: &str, role: UserRole) -> (UserProfile, String) {
    let hash = AuthService::hash_password(TEST_PASSWORD).await.unwrap();
    let profile = ProfileRepository::create(&state.db, email, &hash, role)
        .await
        .unwrap();
    let token = AuthService::create_jwt(state, &profile).unwrap();
    (profile, token)
}

/// What the assistant received on its last call.
#[derive(Debug, Clone, Default)]
pub struct RecordedCall {
    pub system_context: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Canned assistant that records its input.
#[derive(Default)]
pub struct ScriptedAssistant {
    pub reply: String,
    pub last: Mutex<Option<RecordedCall>>,
}

impl ScriptedAssistant {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            last: Mutex::new(None),
        })
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedAssistant {
    async fn generate(
        &self,
        system_context: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> AppResult<Reply> {
        *self.last.lock().unwrap() = Some(RecordedCall {
            system_context: system_context.to_string(),
            history: history.to_vec(),
            message: message.to_string(),
        });
        Ok(Reply {
            message: self.reply.clone(),
            usage: Some(serde_json::json!({ "total_tokens": 42 })),
        })
    }
}

/// Build a JSON request, optionally authenticated with a bearer token.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(json.to_string())
        }
        None => axum::body::Body::empty(),
    };
    builder.body(body).unwrap()
}

/// Drive a router with one request and decode the JSON body (`Null` when empty).
pub async fn send(
    app: axum::Router,
    request: axum::http::Request<axum::body::Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
