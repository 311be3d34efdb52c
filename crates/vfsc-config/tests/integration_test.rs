//! Integration tests for vfsc-config
//!
//! These tests verify the layered config loading with real files on disk.

use std::path::PathBuf;
use tempfile::tempdir;
use vfsc_config::{Config, ConfigError};

/// Test config loading from a single file
#[test]
fn test_load_single_layer_from_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[walk]
follow_symlinks = true
exclude_patterns = [".git", "*.map"]

[emit]
backend = "c"
package = "assets"
"#,
    )
    .unwrap();

    let config = Config::load_layers(&[path], None).unwrap();
    assert!(config.walk.follow_symlinks);
    assert_eq!(config.walk.exclude_patterns, vec![".git", "*.map"]);
    assert_eq!(config.emit.backend, "c");
    assert_eq!(config.emit.package, "assets");
}

/// Test config hierarchy: project overrides global key by key
#[test]
fn test_project_layer_overrides_global() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    let project = temp.path().join("project.toml");

    std::fs::write(
        &global,
        r#"
[walk]
exclude_patterns = [".git"]

[emit]
backend = "c"
package = "assets"
"#,
    )
    .unwrap();
    std::fs::write(
        &project,
        r#"
[emit]
package = "web"
"#,
    )
    .unwrap();

    let config = Config::load_layers(&[global, project], None).unwrap();
    assert_eq!(config.walk.exclude_patterns, vec![".git"]);
    assert_eq!(config.emit.backend, "c");
    assert_eq!(config.emit.package, "web");
}

/// Explicit config wins over every standard layer
#[test]
fn test_explicit_layer_wins() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("project.toml");
    let explicit = temp.path().join("explicit.toml");

    std::fs::write(&project, "[emit]\nbackend = \"c\"\n").unwrap();
    std::fs::write(&explicit, "[emit]\nbackend = \"json\"\n").unwrap();

    let config = Config::load_layers(&[project], Some(&explicit)).unwrap();
    assert_eq!(config.emit.backend, "json");
}

/// Missing standard layers fall back to defaults
#[test]
fn test_missing_layers_use_defaults() {
    let temp = tempdir().unwrap();
    let config = Config::load_layers(&[temp.path().join("absent.toml")], None).unwrap();
    assert_eq!(config, Config::default());
}

/// A missing explicit file is reported, not ignored
#[test]
fn test_missing_explicit_file_is_error() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("missing.toml");

    let err = Config::load_layers(&[], Some(&missing)).unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

/// Malformed TOML names the offending file
#[test]
fn test_malformed_layer_reports_path() {
    let temp = tempdir().unwrap();
    let bad = temp.path().join("bad.toml");
    std::fs::write(&bad, "[emit\nbackend = ").unwrap();

    let err = Config::load_layers(&[bad.clone()], None).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { ref path, .. } if *path == bad));
}

/// Wrong value types name the file that holds them
#[test]
fn test_wrong_type_rejected() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[walk]\nfollow_symlinks = \"sometimes\"\n").unwrap();

    let err = Config::load_layers(&[path.clone()], None).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { path: ref p, .. } if *p == path));
}

/// A bad value in the explicit file is reported against that file
#[test]
fn test_wrong_type_in_explicit_names_explicit_file() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("project.toml");
    let explicit = temp.path().join("explicit.toml");
    std::fs::write(&project, "[emit]\nbackend = \"c\"\n").unwrap();
    std::fs::write(&explicit, "[walk]\nexclude_patterns = \"*.map\"\n").unwrap();

    let err = Config::load_layers(&[project], Some(&explicit)).unwrap_err();
    match err {
        ConfigError::Toml { path, .. } => assert_eq!(path, explicit),
        other => panic!("unexpected error: {other}"),
    }
}

/// A bad value in an earlier layer is not blamed on a later one
#[test]
fn test_wrong_type_in_global_names_global_file() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    let project = temp.path().join("project.toml");
    std::fs::write(&global, "[walk]\nfollow_symlinks = 3\n").unwrap();
    std::fs::write(&project, "[emit]\nbackend = \"c\"\n").unwrap();

    let err = Config::load_layers(&[global.clone(), project], None).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { ref path, .. } if *path == global));
}

#[test]
fn test_global_config_path_shape() {
    if let Some(path) = Config::global_config_path() {
        assert!(path.ends_with(PathBuf::from(".vfsc/config.toml")));
    }
}
