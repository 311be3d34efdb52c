//! Atomic artifact writer.
//!
//! The artifact is streamed into a temporary file next to the destination
//! and renamed over it only after the emitter finished and the data was
//! flushed. A failed run leaves neither a partial artifact nor the temporary
//! file behind.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use vfsc_config::{log_emit_debug, log_emit_info};
use vfsc_manifest::{Catalog, IndexRedirectTable};

use crate::{EmitError, Emitter, Result};

/// What was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub path: PathBuf,
    pub backend: &'static str,
    pub files: usize,
    pub index_files: usize,
    pub bytes_written: u64,
    /// BLAKE3 of the artifact, hex encoded
    pub digest: String,
}

/// Writes one artifact atomically
pub struct ArtifactWriter {
    output_path: PathBuf,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Emit `catalog` and `redirects` through `emitter` and move the result
    /// into place.
    pub fn write(
        &self,
        emitter: &dyn Emitter,
        catalog: &Catalog,
        redirects: &IndexRedirectTable,
    ) -> Result<ArtifactSummary> {
        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".vfsc-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|source| self.write_error(source))?;
        log_emit_debug!(
            "Writing to temporary file",
            temp = temp.path().display().to_string()
        );

        let mut sink = DigestWriter::new(BufWriter::new(temp.as_file()));
        emitter
            .emit(catalog, redirects, &mut sink)
            .map_err(|source| self.write_error(source))?;
        let (bytes_written, digest) = sink.finish().map_err(|source| self.write_error(source))?;

        temp.as_file()
            .sync_all()
            .map_err(|source| self.write_error(source))?;
        temp.persist(&self.output_path)
            .map_err(|e| self.write_error(e.error))?;

        let summary = ArtifactSummary {
            path: self.output_path.clone(),
            backend: emitter.name(),
            files: catalog.len(),
            index_files: redirects.len(),
            bytes_written,
            digest,
        };
        log_emit_info!(
            "Artifact written",
            path = summary.path.display().to_string(),
            backend = summary.backend,
            files = summary.files,
            bytes = summary.bytes_written,
            digest = summary.digest.as_str()
        );
        Ok(summary)
    }

    fn write_error(&self, source: io::Error) -> EmitError {
        EmitError::Write {
            path: self.output_path.clone(),
            source,
        }
    }
}

/// Counts and hashes everything passing through to the inner writer
struct DigestWriter<W: Write> {
    inner: W,
    hasher: blake3::Hasher,
    written: u64,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: blake3::Hasher::new(),
            written: 0,
        }
    }

    fn finish(mut self) -> io::Result<(u64, String)> {
        self.inner.flush()?;
        Ok((self.written, self.hasher.finalize().to_hex().to_string()))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// BLAKE3 hex digest of an artifact already on disk
pub fn digest_file<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}
