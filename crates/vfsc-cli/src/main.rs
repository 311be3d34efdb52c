//! # vfsc CLI
//!
//! Compiles a directory tree into a source file that embeds every file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use vfsc_config::logging::{init_logging, LogLevel};
use vfsc_config::path::is_within_directory;
use vfsc_config::{log_cli_debug, log_cli_info, Config};
use vfsc_emit::{ArtifactSummary, ArtifactWriter, Backend};
use vfsc_manifest::index;
use vfsc_scan::{ExcludeMatcher, WalkOptions, Walker};

/// vfsc - Virtual File System Compiler
#[derive(Parser, Debug)]
#[command(name = "vfsc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to embed
    #[arg(value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Generated source file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output language: odin, c or json
    #[arg(short, long)]
    backend: Option<String>,

    /// Package name (Odin package, C symbol prefix)
    #[arg(short, long)]
    package: Option<String>,

    /// Extra config file, merged over the global and project files
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Follow symbolic links instead of skipping them
    #[arg(long)]
    follow_symlinks: bool,

    /// Leave out files or directories by name or `*.ext` suffix
    #[arg(short, long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(LogLevel::from_verbosity(cli.verbose, cli.quiet));

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = effective_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(directory), Some(output)) = (cli.directory.as_deref(), cli.output.as_deref())
    else {
        eprintln!("{}", Cli::command().render_usage());
        return Ok(ExitCode::FAILURE);
    };

    let summary = generate(directory, output, &config)?;
    println!(
        "Generated {} from {}",
        output.display(),
        directory.display()
    );
    println!(
        "  {} files, {} index files, {} bytes ({}), blake3 {}",
        summary.files, summary.index_files, summary.bytes_written, summary.backend, summary.digest
    );
    Ok(ExitCode::SUCCESS)
}

/// Config files and environment, then command-line flags on top
fn effective_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(backend) = &cli.backend {
        config.emit.backend = backend.clone();
    }
    if let Some(package) = &cli.package {
        config.emit.package = package.clone();
    }
    if cli.follow_symlinks {
        config.walk.follow_symlinks = true;
    }
    config
        .walk
        .exclude_patterns
        .extend(cli.exclude.iter().cloned());

    Ok(config)
}

/// Walk `directory`, index it and write the artifact to `output`
fn generate(directory: &Path, output: &Path, config: &Config) -> Result<ArtifactSummary> {
    let backend: Backend = config.emit.backend.parse()?;
    let emitter = backend.emitter(&config.emit.package)?;

    let mut options = WalkOptions {
        follow_symlinks: config.walk.follow_symlinks,
        exclude: ExcludeMatcher::with_patterns(&config.walk.exclude_patterns),
        skip_paths: Vec::new(),
    };
    if is_within_directory(output, directory) {
        log_cli_debug!(
            "Output lies inside the walked directory",
            output = output.display().to_string()
        );
        options.skip_paths.push(output.to_path_buf());
    }

    let mut walker = Walker::with_options(directory, options);
    let entries = walker
        .walk()
        .with_context(|| format!("Failed to walk {}", directory.display()))?;

    let (catalog, redirects) = index(entries);
    let stats = catalog.stats();
    log_cli_info!(
        "Catalog built",
        files = stats.file_count,
        bytes = stats.total_bytes,
        index_files = redirects.len()
    );

    ArtifactWriter::new(output)
        .write(emitter.as_ref(), &catalog, &redirects)
        .with_context(|| format!("Failed to generate {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "vfsc",
            "site",
            "vfs.h",
            "--backend",
            "c",
            "--package",
            "site",
            "--exclude",
            ".git",
            "--exclude",
            "*.map",
        ])
        .unwrap();
        let config = effective_config(&cli).unwrap();

        assert_eq!(config.emit.backend, "c");
        assert_eq!(config.emit.package, "site");
        assert!(config.walk.exclude_patterns.ends_with(&[".git".to_string(), "*.map".to_string()]));
    }

    #[test]
    fn test_extra_positional_is_rejected() {
        assert!(Cli::try_parse_from(["vfsc", "a", "b", "c"]).is_err());
    }
}
