//! Exclude patterns for the walker.
//!
//! Patterns come from the `[walk]` config section and `--exclude` flags.

use std::path::Path;

/// Exclude pattern matcher
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<String>,
}

impl ExcludeMatcher {
    /// Matcher that excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom patterns
    pub fn with_patterns(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Check if a root-relative path should be left out.
    ///
    /// `*.ext` matches the final component's suffix; any other pattern must
    /// equal a whole component, so `.git` prunes the directory and all below it.
    pub fn should_exclude(&self, relative: &Path) -> bool {
        for pattern in &self.patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if relative
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
                {
                    return true;
                }
            } else if relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy() == *pattern)
            {
                return true;
            }
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Get the patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_excludes_nothing() {
        let matcher = ExcludeMatcher::new();
        assert!(matcher.is_empty());
        assert!(!matcher.should_exclude(&PathBuf::from(".git/config")));
    }

    #[test]
    fn test_component_match() {
        let matcher = ExcludeMatcher::with_patterns(&[".git".to_string()]);
        assert!(matcher.should_exclude(&PathBuf::from(".git")));
        assert!(matcher.should_exclude(&PathBuf::from("vendor/.git/HEAD")));
        assert!(!matcher.should_exclude(&PathBuf::from("my.git/HEAD")));
    }

    #[test]
    fn test_suffix_match() {
        let matcher = ExcludeMatcher::with_patterns(&["*.map".to_string()]);
        assert!(matcher.should_exclude(&PathBuf::from("js/app.js.map")));
        assert!(!matcher.should_exclude(&PathBuf::from("js/app.js")));
        assert!(!matcher.should_exclude(&PathBuf::from("maps/app.js")));
    }

    #[test]
    fn test_empty_patterns_dropped() {
        let matcher = ExcludeMatcher::with_patterns(&[String::new()]);
        assert!(matcher.is_empty());
    }
}
