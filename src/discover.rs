// src/discover.rs

use anyhow::{bail, Context, Result};
use glob::{glob, Pattern};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, trace};

const CLEAN_SUFFIX: &str = "_clean";

/// True for files this tool produced itself (`<stem>_clean.<ext>`).
pub fn is_clean_output(path: &Path) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy().ends_with(CLEAN_SUFFIX))
        .unwrap_or(false)
}

/// `<dir>/<stem>_clean<.ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{CLEAN_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{CLEAN_SUFFIX}"),
    };
    input.with_file_name(name)
}

/// Non-recursive, name-sorted `*.csv` listing of `dir`.
fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.csv", Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Resolve files and directories into the ordered, de-duplicated list of
/// CSV files to clean. Previously cleaned outputs are never selected.
pub fn discover_csv_files(targets: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for target in targets {
        if !target.exists() {
            bail!("Input path {} does not exist.", target.display());
        }
        let resolved = fs::canonicalize(target)
            .with_context(|| format!("resolving {}", target.display()))?;

        if resolved.is_dir() {
            let found = csv_files_in(&resolved)?;
            debug!(dir = %resolved.display(), count = found.len(), "scanned directory");
            files.extend(found.into_iter().filter(|p| !is_clean_output(p)));
        } else if resolved.is_file() {
            if is_clean_output(&resolved) {
                trace!(path = %resolved.display(), "skipping cleaned output");
                continue;
            }
            files.push(resolved);
        } else {
            bail!("Unsupported input target: {}", resolved.display());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|p| seen.insert(p.clone()));

    if files.is_empty() {
        bail!("No CSV files found to clean.");
    }
    Ok(files)
}
