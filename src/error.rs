use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::i18n::t;

/// Every failure a handler can surface. Client-facing variants carry an
/// already translated message; infrastructure variants carry their source
/// and are logged instead of echoed.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not authenticated")]
    Unauthorized,

    #[error("role not allowed")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("assistant failure: {0}")]
    Assistant(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Password(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) | AppError::Assistant(_) | AppError::Request(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Password(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Jwt(_) => "INVALID_TOKEN",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::ServiceUnavailable(_) | AppError::Assistant(_) | AppError::Request(_) => {
                "SERVICE_UNAVAILABLE"
            }
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Password(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::ServiceUnavailable(msg) => msg.clone(),
            AppError::Unauthorized => t("errors.unauthorized"),
            AppError::Forbidden => t("errors.forbidden"),
            AppError::Jwt(_) => t("errors.invalid_token"),
            AppError::Assistant(_) | AppError::Request(_) => t("chat.assistant_error"),
            AppError::Database(_) => t("errors.database"),
            AppError::Password(_) | AppError::Internal(_) => t("errors.internal"),
        }
    }

    fn log(&self) {
        match self {
            AppError::Jwt(e) => tracing::warn!("Rejected token: {:?}", e),
            AppError::Assistant(_)
            | AppError::Request(_)
            | AppError::Password(_)
            | AppError::Database(_)
            | AppError::Internal(_) => tracing::error!("{:?}", self),
            _ => tracing::debug!("Request failed: {}", self),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.public_message(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
