//! # vfsc-emit
//!
//! Turns a [`Catalog`] and [`IndexRedirectTable`] into source text for a
//! target language.
//!
//! ## Design
//!
//! Each target is an [`Emitter`] that writes declarations only: a record type
//! for a virtual file, the ordered file table and the directory index table.
//! Request lookup belongs to the consuming runtime.
//!
//! | Backend | Output                                      |
//! |---------|---------------------------------------------|
//! | `odin`  | `package` + `VirtualFile`/`IndexFile` arrays |
//! | `c`     | header with prefixed `static const` tables  |
//! | `json`  | one JSON document                           |
//!
//! [`ArtifactWriter`] streams an emitter's output to disk atomically.

pub mod c;
pub mod escape;
pub mod json;
pub mod odin;
pub mod writer;

pub use c::CEmitter;
pub use json::JsonEmitter;
pub use odin::OdinEmitter;
pub use writer::{digest_file, ArtifactSummary, ArtifactWriter};

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use vfsc_manifest::{Catalog, IndexRedirectTable};

/// First line of every text artifact
pub const GENERATED_NOTICE: &str = "Code generated by vfsc. DO NOT EDIT.";

/// Errors that can occur while emitting an artifact
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown backend: {0} (expected odin, c or json)")]
    UnknownBackend(String),

    #[error("Invalid package name: {0:?}")]
    InvalidPackage(String),
}

pub type Result<T> = std::result::Result<T, EmitError>;

/// A target syntax for the generated artifact
pub trait Emitter {
    /// Short backend name
    fn name(&self) -> &'static str;

    /// Write the complete artifact to `out`
    fn emit(
        &self,
        catalog: &Catalog,
        redirects: &IndexRedirectTable,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Render an artifact into memory
pub fn emit_to_string(
    emitter: &dyn Emitter,
    catalog: &Catalog,
    redirects: &IndexRedirectTable,
) -> io::Result<String> {
    let mut out = Vec::new();
    emitter.emit(catalog, redirects, &mut out)?;
    String::from_utf8(out).map_err(io::Error::other)
}

/// Built-in backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Odin,
    C,
    Json,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Odin, Backend::C, Backend::Json];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Odin => "odin",
            Backend::C => "c",
            Backend::Json => "json",
        }
    }

    /// Conventional file extension for this backend's artifacts
    pub fn extension(self) -> &'static str {
        match self {
            Backend::Odin => "odin",
            Backend::C => "h",
            Backend::Json => "json",
        }
    }

    /// Build the emitter. `package` must be a valid identifier for Odin and C,
    /// and not an Odin keyword for Odin.
    pub fn emitter(self, package: &str) -> Result<Box<dyn Emitter>> {
        match self {
            Backend::Odin | Backend::C if !escape::is_identifier(package) => {
                Err(EmitError::InvalidPackage(package.to_string()))
            }
            Backend::Odin if escape::is_odin_keyword(package) => {
                Err(EmitError::InvalidPackage(package.to_string()))
            }
            Backend::Odin => Ok(Box::new(OdinEmitter::new(package))),
            Backend::C => Ok(Box::new(CEmitter::new(package))),
            Backend::Json => Ok(Box::new(JsonEmitter::new(package))),
        }
    }
}

impl FromStr for Backend {
    type Err = EmitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "odin" => Ok(Backend::Odin),
            "c" | "h" => Ok(Backend::C),
            "json" => Ok(Backend::Json),
            _ => Err(EmitError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
