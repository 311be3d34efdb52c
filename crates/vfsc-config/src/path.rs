//! Path helpers shared by the walker and the CLI.
//!
//! The output artifact usually does not exist yet when the walk starts, so
//! these helpers resolve paths whose final component may be missing.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Normalize a path where the target file may not exist yet.
///
/// Canonicalizes the parent directory and appends the filename.
///
/// # Example
/// ```ignore
/// let out = normalize_nonexistent("site/vfs.odin")?;
/// assert!(out.is_absolute());
/// ```
pub fn normalize_nonexistent(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let filename = path.file_name().context("Path has no filename")?;

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            let canonical_parent = parent.canonicalize().with_context(|| {
                format!("Failed to resolve parent directory: {}", parent.display())
            })?;
            Ok(canonical_parent.join(filename))
        }
        _ => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Ok(cwd.join(filename))
        }
    }
}

/// Check whether `path` lies inside `dir`.
///
/// `dir` must exist. `path` may name a file that has not been created yet, as
/// long as its parent directory exists. Returns false if either side cannot
/// be resolved.
pub fn is_within_directory(path: impl AsRef<Path>, dir: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let resolved = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => match normalize_nonexistent(path) {
            Ok(p) => p,
            Err(_) => return false,
        },
    };

    match dir.as_ref().canonicalize() {
        Ok(canonical_dir) => resolved.starts_with(&canonical_dir),
        Err(_) => false,
    }
}
