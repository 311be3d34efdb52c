//! Virtual paths: the normalized, root-relative keys of the catalog.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filename prefix that marks a directory's index file
pub const INDEX_PREFIX: &str = "index.";

/// Errors raised while building a [`VirtualPath`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VirtualPathError {
    #[error("Virtual path is empty")]
    Empty,

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8(PathBuf),

    #[error("Path escapes the root: {0:?}")]
    EscapesRoot(PathBuf),
}

/// Forward-slash separated, root-relative path beginning with `/`.
///
/// Never empty, never just `/`, never contains a backslash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VirtualPath(String);

impl VirtualPath {
    /// Build from a path relative to the walk root.
    ///
    /// A file name may itself contain backslashes. They are treated as
    /// separators inside that name: empty and `.` segments drop and `..` pops
    /// a segment without leaving the root. A name that normalizes to nothing
    /// yields [`VirtualPathError::Empty`].
    pub fn from_relative(relative: &Path) -> Result<Self, VirtualPathError> {
        let mut segments: Vec<&str> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(os) => {
                    let name = os
                        .to_str()
                        .ok_or_else(|| VirtualPathError::NonUtf8(relative.to_path_buf()))?;
                    for segment in name.split('\\') {
                        match segment {
                            "" | "." => {}
                            ".." => {
                                segments.pop();
                            }
                            _ => segments.push(segment),
                        }
                    }
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(VirtualPathError::EscapesRoot(relative.to_path_buf()));
                }
            }
        }
        if segments.is_empty() {
            return Err(VirtualPathError::Empty);
        }

        let mut normalized = String::new();
        for segment in segments {
            normalized.push('/');
            normalized.push_str(segment);
        }
        Ok(Self(normalized))
    }

    /// Normalize a request-style string: backslashes become `/`, repeated
    /// slashes collapse, `.` segments drop and a leading `/` is ensured.
    pub fn parse(raw: &str) -> Result<Self, VirtualPathError> {
        let unified = raw.replace('\\', "/");
        let mut normalized = String::with_capacity(unified.len() + 1);
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(VirtualPathError::EscapesRoot(PathBuf::from(raw))),
                _ => {
                    normalized.push('/');
                    normalized.push_str(segment);
                }
            }
        }
        if normalized.is_empty() {
            return Err(VirtualPathError::Empty);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Everything before the final `/`; empty for files at the root
    pub fn dirname(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Key under which this file is recorded in the redirect table
    pub fn directory_key(&self) -> String {
        format!("{}/", self.dirname())
    }

    /// Prefix match on `index.`: `index.anything` qualifies, `myindex.html` does not.
    pub fn is_index_file(&self) -> bool {
        self.file_name().starts_with(INDEX_PREFIX)
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VirtualPath {
    type Error = VirtualPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VirtualPath> for String {
    fn from(value: VirtualPath) -> Self {
        value.0
    }
}
