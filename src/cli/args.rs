//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and converts flags
//! into a [`LoaderConfig`] overlay for the configuration file.

use crate::bundler::{HashAlgorithm, LoaderConfig, LoaderFormat};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Content-addressed bundler for Node.js native addons
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_addon",
    version,
    about = "Content-addressed bundler for Node.js native addons",
    long_about = "Copies native addons (.node files) into a build output directory under \
content-hashed names and writes a loader module next to each one.

Each loader requires its addon relative to its own location at program start, so the
output directory can be moved or deployed as a unit.

Usage:
  kodegen_bundler_addon build/Release/addon.node
  kodegen_bundler_addon native/ --out-dir dist --format cjs
  kodegen_bundler_addon native/ --no-hash --manifest dist/addons.json

Exit code 0 = every addon was emitted."
)]
pub struct Args {
    /// Addon files or directories to scan for addons
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Build output directory (where the host would put its own output)
    #[arg(short = 'o', long, value_name = "DIR", default_value = "dist")]
    pub out_dir: PathBuf,

    /// Directory for addons and loaders, overriding --out-dir
    #[arg(long, value_name = "DIR")]
    pub addon_dir: Option<PathBuf>,

    /// Configuration file (standalone TOML or a Cargo.toml with
    /// [package.metadata.addon-loader])
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Regular expression selecting addon ids (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub include: Vec<String>,

    /// Regular expression excluding addon ids (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Keep original file names instead of inserting a content hash
    #[arg(long)]
    pub no_hash: bool,

    /// Number of hex characters of the content hash to keep
    #[arg(long, value_name = "N")]
    pub hash_length: Option<usize>,

    /// Hash algorithm: md5 or sha256
    #[arg(long, value_name = "ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Loader module format: esm or cjs
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<LoaderFormat>,

    /// Make loaders log the addon they load at startup
    #[arg(long)]
    pub announce: bool,

    /// Where to write the JSON manifest of emitted addons
    /// (default: <addon dir>/addon-manifest.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Fail when a referenced addon does not exist
    #[arg(long)]
    pub strict: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.iter().any(|p| p.as_os_str().is_empty()) {
            return Err("Input paths cannot be empty".to_string());
        }

        if self.hash_length == Some(0) {
            return Err("--hash-length must be at least 1".to_string());
        }

        if self.no_hash && (self.hash_length.is_some() || self.algorithm.is_some()) {
            return Err("--hash-length and --algorithm have no effect with --no-hash".to_string());
        }

        Ok(())
    }

    /// Configuration values given on the command line.
    ///
    /// Only flags that were actually set are present, so the result can be
    /// merged over a configuration file.
    pub fn config_overrides(&self) -> LoaderConfig {
        LoaderConfig {
            include: (!self.include.is_empty()).then(|| self.include.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            output_dir: self.addon_dir.clone(),
            hash: self.no_hash.then_some(false),
            hash_length: self.hash_length,
            algorithm: self.algorithm,
            format: self.format,
            announce: self.announce.then_some(true),
        }
    }

    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
