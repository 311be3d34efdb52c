//! Recursive directory walk producing catalog entries.
//!
//! Entries are visited in file-name order at every level, so two walks of an
//! unchanged tree yield the same sequence.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use vfsc_config::{log_walk_debug, log_walk_info, log_walk_warn};
use vfsc_manifest::{FileEntry, VirtualPath, VirtualPathError};
use walkdir::{DirEntry, WalkDir};

use crate::ignore::ExcludeMatcher;
use crate::{Result, WalkError};

/// Walk configuration
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Follow symbolic links instead of skipping them
    pub follow_symlinks: bool,
    /// Names and suffixes left out of the walk
    pub exclude: ExcludeMatcher,
    /// Files never embedded, typically the artifact being generated
    pub skip_paths: Vec<PathBuf>,
}

/// Counters collected during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: u64,
    pub bytes: u64,
    pub symlinks_skipped: u64,
    pub special_skipped: u64,
    pub excluded: u64,
}

/// Directory walker
pub struct Walker {
    root: PathBuf,
    options: WalkOptions,
    stats: WalkStats,
}

impl Walker {
    /// Create a walker with default options
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, options: WalkOptions) -> Self {
        Self {
            root: root.into(),
            options,
            stats: WalkStats::default(),
        }
    }

    /// Counters from the last call to [`Walker::walk`]
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Walk the tree and read every regular file.
    ///
    /// Any read or traversal failure aborts the walk.
    pub fn walk(&mut self) -> Result<Vec<FileEntry>> {
        self.stats = WalkStats::default();
        let root = self.resolve_root()?;
        let skip = self.resolve_skip_paths();

        log_walk_info!(
            "Walking directory",
            root = root.display().to_string(),
            follow_symlinks = self.options.follow_symlinks
        );

        let exclude = &self.options.exclude;
        let mut excluded = 0u64;
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(self.options.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let keep = !is_excluded(exclude, &root, e);
                if !keep {
                    excluded += 1;
                }
                keep
            });

        let mut entries = Vec::new();
        for item in walker {
            let dir_entry = match item {
                Ok(e) => e,
                Err(err) => match skippable(&err) {
                    Some(reason) => {
                        log_walk_warn!(
                            "Skipping unresolvable entry",
                            path = display_opt(err.path()),
                            reason = reason
                        );
                        continue;
                    }
                    None => return Err(traverse_error(&root, err)),
                },
            };

            let file_type = dir_entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if file_type.is_symlink() {
                log_walk_debug!(
                    "Skipping symlink",
                    path = dir_entry.path().display().to_string()
                );
                self.stats.symlinks_skipped += 1;
                continue;
            }
            if !file_type.is_file() {
                log_walk_debug!(
                    "Skipping special file",
                    path = dir_entry.path().display().to_string()
                );
                self.stats.special_skipped += 1;
                continue;
            }
            if !skip.is_empty() && is_skipped(&skip, dir_entry.path()) {
                log_walk_debug!(
                    "Skipping output artifact",
                    path = dir_entry.path().display().to_string()
                );
                continue;
            }

            let Some(entry) = read_entry(&root, dir_entry)? else {
                continue;
            };
            self.stats.files += 1;
            self.stats.bytes += entry.len() as u64;
            entries.push(entry);
        }
        self.stats.excluded = excluded;

        log_walk_info!(
            "Walk complete",
            files = self.stats.files,
            bytes = self.stats.bytes,
            symlinks_skipped = self.stats.symlinks_skipped,
            excluded = self.stats.excluded
        );
        Ok(entries)
    }

    /// Absolute, canonical root; must be an existing directory
    fn resolve_root(&self) -> Result<PathBuf> {
        let metadata = match fs::metadata(&self.root) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WalkError::NotFound(self.root.clone()));
            }
            Err(source) => {
                return Err(WalkError::Read {
                    path: self.root.clone(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(WalkError::NotADirectory(self.root.clone()));
        }
        self.root.canonicalize().map_err(|source| WalkError::Read {
            path: self.root.clone(),
            source,
        })
    }

    fn resolve_skip_paths(&self) -> HashSet<PathBuf> {
        self.options
            .skip_paths
            .iter()
            .filter_map(|p| p.canonicalize().ok())
            .collect()
    }
}

/// Walk `root` with default options
pub fn walk(root: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
    Walker::new(root.as_ref()).walk()
}

fn is_excluded(exclude: &ExcludeMatcher, root: &Path, entry: &DirEntry) -> bool {
    if exclude.is_empty() {
        return false;
    }
    match entry.path().strip_prefix(root) {
        Ok(relative) => exclude.should_exclude(relative),
        Err(_) => false,
    }
}

fn is_skipped(skip: &HashSet<PathBuf>, path: &Path) -> bool {
    path.canonicalize()
        .map(|canonical| skip.contains(&canonical))
        .unwrap_or(false)
}

/// Read one regular file. Names that normalize to no path at all are skipped.
fn read_entry(root: &Path, dir_entry: DirEntry) -> Result<Option<FileEntry>> {
    let relative = dir_entry
        .path()
        .strip_prefix(root)
        .map_err(|_| WalkError::OutsideRoot(dir_entry.path().to_path_buf()))?;
    let virtual_path = match VirtualPath::from_relative(relative) {
        Ok(vp) => vp,
        Err(VirtualPathError::Empty) => {
            log_walk_warn!(
                "Skipping file whose name has no path segments",
                path = dir_entry.path().display().to_string()
            );
            return Ok(None);
        }
        Err(source) => {
            return Err(WalkError::InvalidPath {
                path: dir_entry.path().to_path_buf(),
                source,
            });
        }
    };

    let source_path = dir_entry.into_path();
    let bytes = fs::read(&source_path).map_err(|source| WalkError::Read {
        path: source_path.clone(),
        source,
    })?;

    log_walk_debug!(
        "Read file",
        path = virtual_path.as_str(),
        len = bytes.len()
    );
    Ok(Some(FileEntry::new(virtual_path, source_path, bytes)))
}

/// Symlink loops and dangling links are skipped rather than fatal
fn skippable(err: &walkdir::Error) -> Option<&'static str> {
    if err.loop_ancestor().is_some() {
        return Some("symlink loop");
    }
    let dangling = err.io_error().is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        && err
            .path()
            .and_then(|p| fs::symlink_metadata(p).ok())
            .is_some_and(|m| m.file_type().is_symlink());
    dangling.then_some("dangling symlink")
}

fn traverse_error(root: &Path, err: walkdir::Error) -> WalkError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("directory walk failed"));
    WalkError::Read { path, source }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}
