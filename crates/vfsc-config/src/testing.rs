//! Test environment abstraction for isolated testing.
//!
//! Provides `TestEnvironment` to manage:
//! - A temporary source tree to walk
//! - A separate output directory for generated artifacts
//!
//! # Usage
//!
//! ```ignore
//! use vfsc_config::testing::TestEnvironment;
//!
//! #[test]
//! fn test_something() {
//!     let env = TestEnvironment::new().unwrap();
//!     env.create_file("sub/index.html", b"<p>x</p>").unwrap();
//!     let out = env.output_path("vfs.odin");
//! }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated test environment with a source tree and an output directory
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Root of the tree handed to the walker
    pub source_root: PathBuf,
    /// Directory for generated artifacts, outside `source_root`
    pub output_dir: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let source_root = root.join("site");
        let output_dir = root.join("out");

        std::fs::create_dir_all(&source_root)?;
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            source_root,
            output_dir,
            test_id,
        })
    }

    /// Create a file under the source root with content
    pub fn create_file(&self, relative_path: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.source_root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Path of an artifact in the output directory (not created)
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Read back an artifact written to the output directory
    pub fn read_output(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        Ok(std::fs::read(self.output_path(name))?)
    }

    /// Names of everything currently in the output directory, sorted
    pub fn output_listing(&self) -> anyhow::Result<Vec<String>> {
        let mut names = std::fs::read_dir(&self.output_dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creates_directories() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.source_root.exists());
        assert!(env.output_dir.exists());
        assert!(!env.output_dir.starts_with(&env.source_root));
    }

    #[test]
    fn test_environment_has_unique_ids() {
        let env1 = TestEnvironment::new().unwrap();
        let env2 = TestEnvironment::new().unwrap();
        assert_ne!(env1.test_id, env2.test_id);
        assert_ne!(env1.source_root, env2.source_root);
    }

    #[test]
    fn test_create_file() {
        let env = TestEnvironment::new().unwrap();
        let path = env.create_file("sub/index.html", b"<p>x</p>").unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"<p>x</p>");
    }

    #[test]
    fn test_output_listing_starts_empty() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.output_listing().unwrap().is_empty());
        std::fs::write(env.output_path("b.txt"), b"").unwrap();
        std::fs::write(env.output_path("a.txt"), b"").unwrap();
        assert_eq!(env.output_listing().unwrap(), vec!["a.txt", "b.txt"]);
    }
}
