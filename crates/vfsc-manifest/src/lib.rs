//! # vfsc-manifest
//!
//! In-memory model of a compiled virtual file system.
//!
//! The [`Catalog`] maps virtual paths to embedded file entries, in walk
//! discovery order, with O(1) lookup. The [`IndexRedirectTable`] maps each
//! directory (with trailing slash) to the index file chosen for it.
//! [`index`] builds both from a walked sequence of entries, and
//! [`router::Router`] answers requests against them.

pub mod router;
pub mod vpath;

pub use router::{LookupState, MimeResolver, Resolution, Router};
pub use vpath::{VirtualPath, VirtualPathError, INDEX_PREFIX};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use vfsc_config::log_index_debug;

/// A single embedded file. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    virtual_path: VirtualPath,
    source_path: PathBuf,
    bytes: Vec<u8>,
}

impl FileEntry {
    pub fn new(virtual_path: VirtualPath, source_path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            virtual_path,
            source_path: source_path.into(),
            bytes,
        }
    }

    /// Lookup key of this entry
    pub fn virtual_path(&self) -> &VirtualPath {
        &self.virtual_path
    }

    /// Where the bytes were read from
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Raw file content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the content in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Ordered set of file entries keyed by virtual path
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<FileEntry>,
    positions: HashMap<VirtualPath, usize>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A later entry with the same virtual path replaces the
    /// earlier one in place and the replaced entry is returned.
    pub fn insert(&mut self, entry: FileEntry) -> Option<FileEntry> {
        match self.positions.get(entry.virtual_path()) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx], entry)),
            None => {
                self.positions
                    .insert(entry.virtual_path().clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Get an entry by exact virtual path
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        let vp = VirtualPath::parse(path).ok()?;
        if vp.as_str() != path {
            return None;
        }
        self.positions.get(&vp).map(|&idx| &self.entries[idx])
    }

    /// Check if a path exists in the catalog
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    /// Get catalog statistics
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            file_count: self.entries.len() as u64,
            total_bytes: self.entries.iter().map(|e| e.len() as u64).sum(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Statistics about a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub file_count: u64,
    pub total_bytes: u64,
}

/// Directory (with trailing slash) → virtual path of its index file.
///
/// Iteration follows the order in which directories were first given an
/// index file.
#[derive(Debug, Clone, Default)]
pub struct IndexRedirectTable {
    entries: Vec<(String, VirtualPath)>,
    positions: HashMap<String, usize>,
}

impl IndexRedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `directory -> target` unless `directory` already has one.
    /// Returns whether the entry was recorded.
    pub fn insert_if_absent(&mut self, directory: String, target: VirtualPath) -> bool {
        if self.positions.contains_key(&directory) {
            return false;
        }
        self.positions.insert(directory.clone(), self.entries.len());
        self.entries.push((directory, target));
        true
    }

    /// Index file recorded for `directory` (which must end with `/`)
    pub fn get(&self, directory: &str) -> Option<&VirtualPath> {
        self.positions
            .get(directory)
            .map(|&idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(directory, index file)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VirtualPath)> {
        self.entries.iter().map(|(dir, target)| (dir.as_str(), target))
    }
}

/// Build the catalog and redirect table from walked entries.
///
/// The catalog keeps walk order; duplicate virtual paths resolve to the last
/// entry. The first `index.*` file seen in a directory becomes its redirect
/// target; later ones stay in the catalog but are not redirect targets.
pub fn index<I>(entries: I) -> (Catalog, IndexRedirectTable)
where
    I: IntoIterator<Item = FileEntry>,
{
    let mut catalog = Catalog::new();
    let mut redirects = IndexRedirectTable::new();

    for entry in entries {
        if entry.virtual_path().is_index_file() {
            let key = entry.virtual_path().directory_key();
            if redirects.insert_if_absent(key, entry.virtual_path().clone()) {
                log_index_debug!("Index file selected", path = entry.virtual_path().as_str());
            } else {
                log_index_debug!(
                    "Index file shadowed by earlier index",
                    path = entry.virtual_path().as_str()
                );
            }
        }

        if let Some(replaced) = catalog.insert(entry) {
            log_index_debug!(
                "Duplicate virtual path replaced",
                path = replaced.virtual_path().as_str()
            );
        }
    }

    (catalog, redirects)
}
