//! Candidate discovery: headers under `Source/` that still need migrating.
//!
//! Read-only, so it can walk in parallel:
//! - Early directory pruning via `WalkDir::filter_entry`
//! - Parallel read + match via Rayon's `par_bridge`
//! - Sorted output, so listings are stable between runs

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::migrate::is_excluded;
use crate::rewrite::Rewriter;
use crate::root::SOURCE_DIR;

/// Build output and tool directories never worth scanning.
const EXCLUDED_DIRS: &[&str] = &["Intermediate", "Binaries", ".git", ".vs"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Root-relative path with forward slashes, the form used in target lists.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

/// Gathers all `.h` files under `<root>/Source`.
pub fn gather_headers(root: &Path) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let source = root.join(SOURCE_DIR);

    WalkDir::new(&source)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "h") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather headers from {}", source.display()))
}

/// Headers that hold a legacy declaration, lack the marker and are not excluded.
///
/// Unreadable files are silently left out; this is a listing, not a migration.
pub fn discover_candidates(
    root: &Path,
    rewriter: &Rewriter,
    excludes: &[String],
) -> Result<Vec<String>> {
    let headers = gather_headers(root)?;

    let mut found: Vec<String> = headers
        .par_iter()
        .filter_map(|path| {
            let key = relative_key(root, path)?;
            if is_excluded(&key, excludes) {
                return None;
            }
            let text = fs::read_to_string(path).ok()?;
            let pending = !rewriter.is_converted(&text) && !rewriter.extract(&text).is_empty();
            pending.then_some(key)
        })
        .collect();

    found.sort();
    Ok(found)
}
