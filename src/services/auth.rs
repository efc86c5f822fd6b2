use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::{ProfileRepository, UserProfile, UserRole};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::AppState;

#[cfg(not(test))]
const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const BCRYPT_COST: u32 = 4;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Checks that need no database access, in the order users see them.
pub fn validate_password_change(change: &PasswordChange) -> AppResult<()> {
    if change.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(i18n::t("validation.password_too_short")));
    }
    if change.new_password != change.confirm_password {
        return Err(AppError::Validation(i18n::t("validation.password_mismatch")));
    }
    if change.current_password == change.new_password {
        return Err(AppError::Validation(i18n::t("validation.password_unchanged")));
    }
    Ok(())
}

pub struct AuthService;

impl AuthService {
    /// Create a signed JWT for a profile
    pub fn create_jwt(state: &Arc<AppState>, profile: &UserProfile) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(state.config.jwt.expiration_hours);
        let claims = Claims {
            sub: profile.id.clone(),
            role: profile.role(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Decode and validate a JWT, returning the claims
    pub fn decode_jwt(state: &Arc<AppState>, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Resolve the profile behind a token. The role is re-read from the
    /// database so a demoted user loses admin rights immediately.
    pub async fn get_user_from_token(state: &Arc<AppState>, token: &str) -> AppResult<UserProfile> {
        let claims = Self::decode_jwt(state, token)?;
        ProfileRepository::find_by_id(&state.db, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    pub async fn hash_password(password: &str) -> AppResult<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
            .map_err(AppError::Password)
    }

    pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Verify task failed: {}", e)))?
            .map_err(AppError::Password)
    }

    /// Email/password sign-in. Unknown emails and wrong passwords look the same.
    pub async fn login(
        state: &Arc<AppState>,
        email: &str,
        password: &str,
    ) -> AppResult<(String, UserProfile)> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(i18n::t("validation.credentials_required")));
        }

        let profile = ProfileRepository::find_by_email(&state.db, email).await?;
        let Some(profile) = profile else {
            tracing::info!("Login attempt for unknown email");
            return Err(AppError::BadRequest(i18n::t("auth.invalid_credentials")));
        };

        if !Self::verify_password(password, &profile.password_hash).await? {
            tracing::info!("Wrong password for profile {}", profile.id);
            return Err(AppError::BadRequest(i18n::t("auth.invalid_credentials")));
        }

        let token = Self::create_jwt(state, &profile)?;
        tracing::info!("Profile {} signed in", profile.id);
        Ok((token, profile))
    }

    pub async fn change_password(
        state: &Arc<AppState>,
        profile: &UserProfile,
        change: PasswordChange,
    ) -> AppResult<()> {
        validate_password_change(&change)?;

        if !Self::verify_password(&change.current_password, &profile.password_hash).await? {
            return Err(AppError::Validation(i18n::t("validation.password_incorrect")));
        }

        let hash = Self::hash_password(&change.new_password).await?;
        ProfileRepository::update_password(&state.db, &profile.id, &hash).await?;
        tracing::info!("Password updated for profile {}", profile.id);
        Ok(())
    }

    /// Create the configured administrator if no profile uses that email yet.
    pub async fn ensure_bootstrap_admin(state: &Arc<AppState>) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            state.config.bootstrap.admin_email.as_deref(),
            state.config.bootstrap.admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if ProfileRepository::find_by_email(&state.db, email).await?.is_some() {
            tracing::debug!("Bootstrap admin already present");
            return Ok(());
        }

        let hash = Self::hash_password(password).await?;
        let profile = ProfileRepository::create(&state.db, email, &hash, UserRole::Admin).await?;
        tracing::info!("Created bootstrap admin profile {}", profile.id);
        Ok(())
    }
}
