//! Command line and file handling for `crosswordcoach-import`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use crosswordcoach_core::types::CrosswordPuzzle;
use crosswordcoach_db::handle::StoreBackend;

/// Load scraped puzzle files into the entry store.
///
/// Uses the same `ENTRY_STORE` / `DATABASE_URL` settings as the server.
#[derive(Debug, Parser)]
#[command(name = "crosswordcoach-import", version)]
pub struct Cli {
    /// Puzzle JSON files, or directories scanned (not recursively) for `*.json`.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

impl Cli {
    /// Every puzzle file named on the command line, directories expanded in
    /// sorted order.
    pub fn puzzle_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in &self.paths {
            collect_puzzle_files(path, &mut files)?;
        }
        Ok(files)
    }
}

/// Reject backends that would drop the imported data on exit.
pub fn persistent_backend(backend: StoreBackend) -> anyhow::Result<StoreBackend> {
    match backend {
        StoreBackend::Memory => anyhow::bail!(
            "ENTRY_STORE=memory keeps puzzles only for the lifetime of this process; \
             import into ENTRY_STORE=postgres instead"
        ),
        backend => Ok(backend),
    }
}

fn collect_puzzle_files(path: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    if !path.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let mut found: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    found.sort();
    files.extend(found);
    Ok(())
}

/// Read and decode one puzzle file.
pub fn load_puzzle(path: &Path) -> anyhow::Result<CrosswordPuzzle> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid puzzle JSON in {}", path.display()))
}
