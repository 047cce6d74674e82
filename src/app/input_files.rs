//! Input list discovery from `--txt-paths` or `--txt-dir`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::cli::Args;

/// Returns the input lists to process, in processing order.
///
/// `--txt-paths` are returned as given, existing or not; missing files are
/// reported when their turn comes. `--txt-dir` must exist and expands to its
/// `*.txt` files sorted by name.
pub(crate) fn resolve_input_files(args: &Args) -> Result<Vec<PathBuf>> {
    match &args.txt_dir {
        Some(dir) => list_txt_files(dir),
        None => Ok(args.txt_paths.clone()),
    }
}

fn list_txt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Input directory '{}' does not exist", dir.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory '{}'", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to read entry in '{}'", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "expanded input directory");
    Ok(files)
}
