//! Load scraped puzzle files into the entry store.
//!
//! ```text
//! crosswordcoach-import <file.json | directory>...
//! ```
//!
//! Each file holds one puzzle (`{id, date, source, entries}`). Directories are
//! scanned for `*.json` files (not recursively). Uses the same `ENTRY_STORE` /
//! `DATABASE_URL` settings as the server; the in-memory store is refused.

use anyhow::Context;
use clap::Parser;
use crosswordcoach_db::handle::StoreHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crosswordcoach_api::config::store_backend_from_env;
use crosswordcoach_api::import::{load_puzzle, persistent_backend, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crosswordcoach_import=info,crosswordcoach_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let files = cli.puzzle_files()?;
    let backend = persistent_backend(store_backend_from_env()?)?;
    let handle = StoreHandle::new(backend);
    let store = handle.get().await.context("Failed to connect to the entry store")?;

    let mut saved = 0usize;
    let mut failed = 0usize;
    for file in &files {
        match load_puzzle(file) {
            Ok(puzzle) => match store.save_puzzle(&puzzle).await {
                Ok(()) => {
                    saved += 1;
                    tracing::info!(
                        id = %puzzle.id,
                        source = %puzzle.source,
                        entries = puzzle.entries.len(),
                        "Saved puzzle"
                    );
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(id = %puzzle.id, error = %e, "Failed to save puzzle");
                }
            },
            Err(e) => {
                failed += 1;
                tracing::error!(path = %file.display(), error = format!("{e:#}"), "Skipping file");
            }
        }
    }

    tracing::info!(saved, failed, "Import finished");
    if failed > 0 {
        anyhow::bail!("{failed} of {} puzzle files failed to import", files.len());
    }
    Ok(())
}
