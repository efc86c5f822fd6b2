use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::db::UserProfile;
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::services::auth::{AuthService, PasswordChange};
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password", post(change_password))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl From<&UserProfile> for UserResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            email: profile.email.clone(),
            role: profile.role().as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============================================================================
// Session cookie
// ============================================================================

fn cookie_secure(state: &AppState) -> bool {
    state
        .config
        .server
        .cookie_secure
        .unwrap_or_else(|| state.config.server.frontend_url.starts_with("https://"))
}

fn cookie_same_site(state: &AppState) -> SameSite {
    match state
        .config
        .server
        .cookie_same_site
        .as_deref()
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("strict") => SameSite::Strict,
        Some("none") => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(cookie_secure(state))
        .same_site(cookie_same_site(state))
        .build()
}

// ============================================================================
// Handlers
// ============================================================================

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, profile) = AuthService::login(&state, &request.email, &request.password).await?;
    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            token,
            user: UserResponse::from(&profile),
        }),
    ))
}

/// Tokens are stateless; logging out only drops the cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (
        jar,
        Json(serde_json::json!({ "message": i18n::t("auth.logged_out") })),
    )
}

async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(change): Json<PasswordChange>,
) -> AppResult<Json<serde_json::Value>> {
    AuthService::change_password(&state, &user, change).await?;
    Ok(Json(
        serde_json::json!({ "message": i18n::t("auth.password_updated") }),
    ))
}

// ============================================================================
// Extractors
// ============================================================================

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    if !header.to_ascii_lowercase().starts_with("bearer ") {
        tracing::debug!("Authorization header doesn't start with 'Bearer '");
        return None;
    }
    let token = header[7..].trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Signed-in profile, from the `Authorization: Bearer` header or the session cookie.
pub struct AuthUser(pub UserProfile);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| {
                tracing::debug!("No bearer token or session cookie");
                AppError::Unauthorized
            })?;

        let user = AuthService::get_user_from_token(state, &token)
            .await
            .map_err(|e| {
                tracing::debug!("Failed to get user from token: {:?}", e);
                e
            })?;

        tracing::debug!("Authenticated profile: {}", user.id);
        Ok(AuthUser(user))
    }
}

/// Signed-in profile with the admin role; common users get 403.
pub struct AdminUser(pub UserProfile);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::info!("Profile {} denied admin action", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
