use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin (default: `http://localhost:3000`).
    pub api_base_url: String,
    /// Entries endpoint path below the origin (default: `entries`).
    pub entries_path: String,
    /// Entries per page (default: `20`).
    pub page_size: u32,
    /// Prefetch the next page this many entries before the end (default: `5`).
    pub entry_buffer: usize,
    /// Progress file (default: `.crosswordcoach/progress.json`).
    pub progress_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                         |
    /// |---------------------------------|---------------------------------|
    /// | `API_BASE_URL`                  | `http://localhost:3000`         |
    /// | `ENTRIES_PATH`                  | `entries`                       |
    /// | `PAGE_SIZE`                     | `20`                            |
    /// | `ENTRY_BUFFER_BEFORE_NEXT_LOAD` | `5`                             |
    /// | `PROGRESS_FILE`                 | `.crosswordcoach/progress.json` |
    pub fn from_env() -> anyhow::Result<Self> {
        let page_size = env_or("PAGE_SIZE", 20u32)?;
        if page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be at least 1");
        }

        Ok(Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            entries_path: std::env::var("ENTRIES_PATH").unwrap_or_else(|_| "entries".into()),
            page_size,
            entry_buffer: env_or("ENTRY_BUFFER_BEFORE_NEXT_LOAD", 5usize)?,
            progress_file: std::env::var("PROGRESS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".crosswordcoach/progress.json")),
        })
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
