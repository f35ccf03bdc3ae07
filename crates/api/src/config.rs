use std::str::FromStr;

use anyhow::Context;
use crosswordcoach_db::handle::StoreBackend;

/// Default chat-completions base URL for the explainer.
const DEFAULT_EXPLAINER_BASE_URL: &str = "https://api.openai.com/v1";

/// Default explainer model.
const DEFAULT_EXPLAINER_MODEL: &str = "gpt-4o-mini";

/// Settings for the LLM-backed explainer.
#[derive(Debug, Clone)]
pub struct ExplainerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where entries live. Connected on first use, not at startup.
    pub store: StoreBackend,
    /// `None` disables explanation generation.
    pub explainer: Option<ExplainerConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `ENTRY_STORE`          | `postgres`                  |
    /// | `DATABASE_URL`         | required for `postgres`     |
    /// | `DB_MAX_CONNECTIONS`   | `10`                        |
    /// | `EXPLAINER_API_KEY`    | unset (explanations off)    |
    /// | `EXPLAINER_BASE_URL`   | `https://api.openai.com/v1` |
    /// | `EXPLAINER_MODEL`      | `gpt-4o-mini`               |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 3000u16)?;
        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 30u64)?;
        let store = store_backend_from_env()?;

        let explainer = std::env::var("EXPLAINER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|api_key| ExplainerConfig {
                api_key,
                base_url: std::env::var("EXPLAINER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_EXPLAINER_BASE_URL.into()),
                model: std::env::var("EXPLAINER_MODEL")
                    .unwrap_or_else(|_| DEFAULT_EXPLAINER_MODEL.into()),
            });

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            store,
            explainer,
        })
    }
}

/// Read the entry store selection (`ENTRY_STORE`, `DATABASE_URL`,
/// `DB_MAX_CONNECTIONS`).
pub fn store_backend_from_env() -> anyhow::Result<StoreBackend> {
    let kind = std::env::var("ENTRY_STORE").unwrap_or_else(|_| "postgres".into());
    match kind.as_str() {
        "memory" => Ok(StoreBackend::Memory),
        "postgres" => Ok(StoreBackend::Postgres {
            database_url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set when ENTRY_STORE=postgres")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10u32)?,
        }),
        other => anyhow::bail!("ENTRY_STORE must be 'postgres' or 'memory', got '{other}'"),
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
