//! Writing command results to a file or stdout.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Write `text` to `path`, or print it when no path is given.
pub fn emit(text: &str, path: Option<&Path>, what: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {what}: {}", path.display()))?;
            info!(path = %path.display(), "{what} written");
        }
        None => print!("{text}"),
    }
    Ok(())
}
