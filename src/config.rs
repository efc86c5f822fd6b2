use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub bootstrap: BootstrapConfig,
    pub assistant: AssistantConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Whether to set the `Secure` flag on the session cookie.
    /// If `None`, it is inferred from `frontend_url` (`https` -> true).
    /// Read from env var `COOKIE_SECURE` (accepted values: "true"/"false", "1"/"0", "yes"/"no").
    pub cookie_secure: Option<bool>,
    /// Preferred SameSite value for the session cookie. Read from env var `COOKIE_SAMESITE`
    /// (accepted values: "Lax", "Strict", "None").
    pub cookie_same_site: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Allowed requests per second (per IP) for auth endpoints (e.g. /api/auth/login)
    pub auth_per_second: u32,
    /// Burst size for auth endpoints
    pub auth_burst: u32,
}

/// Optional administrator account created at startup when no profile with
/// that email exists yet.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// When unset the chat endpoint answers with 503.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer` to the provider.
    pub app_url: String,
    pub app_title: String,
    /// How many previous messages of the conversation are forwarded.
    pub history_limit: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// First visible hour of the week grid.
    pub start_hour: u32,
    /// Number of one-hour rows in the week grid.
    pub visible_hours: u32,
    /// Offset from UTC used to decide what "today" is.
    pub utc_offset_hours: i32,
}

fn env_flag(name: &str) -> Option<bool> {
    match env::var(name).ok()?.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Non-empty value of `name`, if set.
fn env_text(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parsed value of `name`, `default` when unset. A set but unparsable value
/// is an error rather than a silent fallback.
fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env_text(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

impl Config {
    /// Defaults overlaid with the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let config = Config {
            server: ServerConfig {
                host: env_text("HOST").unwrap_or(defaults.server.host),
                port: env_parsed("PORT", defaults.server.port)?,
                frontend_url: env_text("FRONTEND_URL").unwrap_or(defaults.server.frontend_url),
                cookie_secure: env_flag("COOKIE_SECURE"),
                cookie_same_site: env_text("COOKIE_SAMESITE"),
            },
            database: DatabaseConfig {
                url: env_text("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: env_parsed(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
            },
            jwt: JwtConfig {
                secret: env_text("JWT_SECRET")
                    .ok_or_else(|| ConfigError::MissingEnv("JWT_SECRET".to_string()))?,
                expiration_hours: env_parsed("JWT_EXPIRATION_HOURS", defaults.jwt.expiration_hours)?,
            },
            rate_limit: RateLimitConfig {
                auth_per_second: env_parsed(
                    "RATE_LIMIT_AUTH_PER_SECOND",
                    defaults.rate_limit.auth_per_second,
                )?,
                auth_burst: env_parsed("RATE_LIMIT_AUTH_BURST", defaults.rate_limit.auth_burst)?,
            },
            bootstrap: BootstrapConfig {
                admin_email: env_text("ADMIN_EMAIL"),
                admin_password: env_text("ADMIN_PASSWORD"),
            },
            assistant: AssistantConfig {
                api_key: env_text("OPENROUTER_API_KEY"),
                model: env_text("OPENROUTER_MODEL").unwrap_or(defaults.assistant.model),
                base_url: env_text("OPENROUTER_BASE_URL").unwrap_or(defaults.assistant.base_url),
                app_url: env_text("APP_URL").unwrap_or(defaults.assistant.app_url),
                app_title: env_text("APP_TITLE").unwrap_or(defaults.assistant.app_title),
                history_limit: env_parsed(
                    "ASSISTANT_HISTORY_LIMIT",
                    defaults.assistant.history_limit,
                )?,
                ..defaults.assistant
            },
            calendar: CalendarConfig {
                start_hour: env_parsed("CALENDAR_START_HOUR", defaults.calendar.start_hour)?,
                visible_hours: env_parsed(
                    "CALENDAR_VISIBLE_HOURS",
                    defaults.calendar.visible_hours,
                )?,
                utc_offset_hours: env_parsed(
                    "CALENDAR_UTC_OFFSET_HOURS",
                    defaults.calendar.utc_offset_hours,
                )?,
            },
        };

        config.calendar.validate()?;
        Ok(config)
    }
}

impl CalendarConfig {
    /// The visible grid has to fit inside one day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visible_hours == 0 || self.start_hour.saturating_add(self.visible_hours) > 24 {
            return Err(ConfigError::InvalidValue(
                "CALENDAR_START_HOUR/CALENDAR_VISIBLE_HOURS".to_string(),
            ));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::InvalidValue(
                "CALENDAR_UTC_OFFSET_HOURS".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                frontend_url: "http://localhost:3000".to_string(),
                cookie_secure: None,
                cookie_same_site: None,
            },
            database: DatabaseConfig {
                url: "sqlite://data/app.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: String::new(),
                expiration_hours: 24,
            },
            rate_limit: RateLimitConfig {
                auth_per_second: 3,
                auth_burst: 10,
            },
            bootstrap: BootstrapConfig {
                admin_email: None,
                admin_password: None,
            },
            assistant: AssistantConfig {
                api_key: None,
                model: "openai/gpt-4o-mini".to_string(),
                base_url: "https://openrouter.ai/api/v1".to_string(),
                app_url: "http://localhost:3000".to_string(),
                app_title: "Complejos Deportivos".to_string(),
                history_limit: 10,
                temperature: 0.7,
                max_tokens: 1000,
            },
            calendar: CalendarConfig {
                start_hour: 8,
                visible_hours: 16,
                utc_offset_hours: -3,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calendar_grid_is_valid() {
        assert!(Config::default().calendar.validate().is_ok());
    }

    #[test]
    fn rejects_grid_past_midnight() {
        let grid = CalendarConfig {
            start_hour: 20,
            visible_hours: 6,
            utc_offset_hours: -3,
        };
        assert!(matches!(grid.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn huge_hour_values_are_rejected_without_overflow() {
        let grid = CalendarConfig {
            start_hour: u32::MAX,
            visible_hours: 2,
            utc_offset_hours: 0,
        };
        assert!(grid.validate().is_err());
    }

    #[test]
    fn rejects_impossible_utc_offset() {
        let grid = CalendarConfig {
            start_hour: 8,
            visible_hours: 16,
            utc_offset_hours: 30,
        };
        assert!(grid.validate().is_err());
    }
}
