//! # vfsc-config
//!
//! Configuration management for the vfsc virtual file system compiler.
//!
//! Loads configuration from:
//! 1. `~/.vfsc/config.toml` (global)
//! 2. `.vfsc/config.toml` (project-local, overrides global)
//! 3. An explicit `--config <file>` (overrides project)
//! 4. Environment variables (highest priority)
//!
//! Later layers are merged key-by-key over earlier ones, so a project file
//! only needs to name the settings it changes.

pub mod logging;
pub mod path;
pub mod testing;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default emitter backend name
pub const DEFAULT_BACKEND: &str = "odin";
/// Default package name for backends that declare one
pub const DEFAULT_PACKAGE: &str = "vfs";

/// Relative location of the project config file
pub const PROJECT_CONFIG_PATH: &str = ".vfsc/config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub walk: WalkConfig,
    pub emit: EmitConfig,
}

impl Config {
    /// Load config from standard locations, then apply `explicit` and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        if let Some(global_path) = Self::global_config_path() {
            layers.push(global_path);
        }
        layers.push(PathBuf::from(PROJECT_CONFIG_PATH));

        let mut config = Self::load_layers(&layers, explicit)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Merge the given config files in order. Missing optional layers are skipped;
    /// a missing `explicit` file is an error.
    pub fn load_layers(layers: &[PathBuf], explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();
        let mut last_loaded = None;

        for layer in layers {
            if layer.exists() {
                debug!("Loading config layer from {:?}", layer);
                merge_tables(&mut merged, read_table(layer)?);
                last_loaded = Some(layer.as_path());
            }
        }

        if let Some(path) = explicit {
            debug!("Loading explicit config from {:?}", path);
            merge_tables(&mut merged, read_table(path)?);
            last_loaded = Some(path);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ConfigError::Toml {
                path: last_loaded.map(Path::to_path_buf).unwrap_or_default(),
                source,
            })
    }

    /// Global config path: ~/.vfsc/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".vfsc/config.toml"))
    }

    /// Apply environment variable overrides.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("VFSC_BACKEND") {
            self.emit.backend = backend;
        }
        if let Some(package) = lookup("VFSC_PACKAGE") {
            self.emit.package = package;
        }
        if let Some(value) = lookup("VFSC_FOLLOW_SYMLINKS") {
            self.walk.follow_symlinks = parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                key: "VFSC_FOLLOW_SYMLINKS",
                value,
            })?;
        }
        Ok(())
    }

    /// Render this config as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default config TOML string
    pub fn default_toml() -> Result<String, ConfigError> {
        Config::default().to_toml()
    }
}

/// Directory walk configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Follow symbolic links instead of skipping them
    pub follow_symlinks: bool,
    /// File or directory names (or `*.ext` suffixes) left out of the catalog
    pub exclude_patterns: Vec<String>,
}

/// Artifact emission configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Target syntax: odin, c or json
    pub backend: String,
    /// Package/module name written at the top of the artifact
    pub package: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
        }
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    // Type errors are reported against the file that holds the bad value
    toml::Value::Table(table.clone())
        .try_into::<Config>()
        .map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(table)
}

/// Recursively overlay `overlay` onto `base`. Nested tables merge; any other
/// value replaces what was there.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, toml::Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
