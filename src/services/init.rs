//! Startup wiring that `main` calls once: the SQLite pool with its migrations
//! and the optional assistant client.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::services::assistant::{OpenRouterClient, TextGenerator};

/// Where a `DATABASE_URL` points.
#[derive(Debug, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    pub fn from_url(db_url: &str) -> Self {
        let rest = db_url
            .strip_prefix("sqlite://")
            .or_else(|| db_url.strip_prefix("sqlite:"))
            .unwrap_or(db_url);
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path == ":memory:" {
            DatabaseTarget::Memory
        } else {
            DatabaseTarget::File(PathBuf::from(path))
        }
    }
}

/// Log-safe form of the database URL: no userinfo, no query parameters.
pub fn loggable_db_url(db_url: &str) -> String {
    match url::Url::parse(db_url) {
        Ok(mut parsed) => {
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => match db_url.rsplit_once('@') {
            Some((_, tail)) => format!("(redacted)@{}", tail),
            None => db_url.split('?').next().unwrap_or_default().to_string(),
        },
    }
}

/// Open the pool and bring the schema up to date.
///
/// Foreign keys are enforced so deleting a professor cascades to their
/// schedules. File databases get their parent directory created first.
pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let db_url = &config.database.url;
    tracing::info!("Opening database {}", loggable_db_url(db_url));

    let options = match DatabaseTarget::from_url(db_url) {
        DatabaseTarget::Memory => {
            tracing::warn!("Using an in-memory database; data is lost on restart");
            SqliteConnectOptions::from_str("sqlite::memory:")?
        }
        DatabaseTarget::File(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating database directory {}", dir.display()))?;
            }
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true)
        }
    }
    .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await
        .context("connecting to sqlite")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("applying migrations")?;
    tracing::info!("Database schema is current");

    Ok(pool)
}

/// The assistant is built only when an API key is configured; otherwise
/// `/api/chat` answers 503.
pub fn init_assistant(config: &Config) -> Result<Option<Arc<dyn TextGenerator>>> {
    if config.assistant.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set; chat assistant disabled");
        return Ok(None);
    }
    let client = OpenRouterClient::new(&config.assistant)?;
    tracing::info!("Chat assistant enabled (model {})", config.assistant.model);
    Ok(Some(Arc::new(client)))
}
