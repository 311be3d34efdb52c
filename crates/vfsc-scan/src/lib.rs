//! # vfsc-scan
//!
//! Walks a directory tree and reads every regular file into a
//! [`vfsc_manifest::FileEntry`], ready for indexing.

pub mod ignore;
pub mod walker;

pub use ignore::ExcludeMatcher;
pub use walker::{walk, WalkOptions, WalkStats, Walker};

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vfsc_manifest::VirtualPathError;

/// Errors that can occur while walking a tree
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot map {path} to a virtual path: {source}")]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: VirtualPathError,
    },

    #[error("Walked outside the root: {0}")]
    OutsideRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, WalkError>;
