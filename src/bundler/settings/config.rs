//! TOML configuration.
//!
//! Settings can live in a standalone file:
//!
//! ```toml
//! include = ['\.node$']
//! exclude = ['/test/']
//! output_dir = "dist"
//! hash = true
//! hash_length = 8
//! algorithm = "md5"
//! format = "esm"
//! ```
//!
//! or in `Cargo.toml` under `[package.metadata.addon-loader]`.

use super::LoaderSettingsBuilder;
use crate::bundler::{
    error::{Context, ErrorExt, Result},
    fingerprint::HashAlgorithm,
    loader::LoaderFormat,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw configuration as written in TOML. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoaderConfig {
    /// Include patterns.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// Exclude patterns.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// Output directory override.
    #[serde(default, alias = "outputDir")]
    pub output_dir: Option<PathBuf>,

    /// Digest-based renaming.
    #[serde(default)]
    pub hash: Option<bool>,

    /// Digest truncation length.
    #[serde(default, alias = "hashLength")]
    pub hash_length: Option<usize>,

    /// Digest algorithm.
    #[serde(default)]
    pub algorithm: Option<HashAlgorithm>,

    /// Loader module format.
    #[serde(default)]
    pub format: Option<LoaderFormat>,

    /// Startup announcement in loaders.
    #[serde(default)]
    pub announce: Option<bool>,
}

impl LoaderConfig {
    /// Parses a standalone configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Extracts `[package.metadata.addon-loader]` from a Cargo manifest.
    ///
    /// A manifest without the table yields the default configuration.
    pub fn from_cargo_manifest_str(content: &str) -> Result<Self> {
        let manifest: toml::Table = toml::from_str(content)?;
        match manifest
            .get("package")
            .and_then(|p| p.get("metadata"))
            .and_then(|m| m.get("addon-loader"))
        {
            Some(table) => table
                .clone()
                .try_into::<Self>()
                .context("invalid [package.metadata.addon-loader] table"),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from `path`.
    ///
    /// Files named `Cargo.toml` are read as manifests, anything else as a
    /// standalone configuration file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading configuration", path)?;

        let config = if path.file_name().is_some_and(|n| n == "Cargo.toml") {
            Self::from_cargo_manifest_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        log::debug!("Loaded addon loader configuration from {}", path.display());
        Ok(config)
    }

    /// Applies every value present in this configuration to `builder`.
    pub fn apply(self, mut builder: LoaderSettingsBuilder) -> LoaderSettingsBuilder {
        if let Some(include) = self.include {
            builder = builder.include(include);
        }
        if let Some(exclude) = self.exclude {
            builder = builder.exclude(exclude);
        }
        if let Some(dir) = self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(hash) = self.hash {
            builder = builder.hash(hash);
        }
        if let Some(length) = self.hash_length {
            builder = builder.hash_length(length);
        }
        if let Some(algorithm) = self.algorithm {
            builder = builder.algorithm(algorithm);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(announce) = self.announce {
            builder = builder.announce(announce);
        }
        builder
    }

    /// Overlays `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: LoaderConfig) -> LoaderConfig {
        LoaderConfig {
            include: other.include.or(self.include),
            exclude: other.exclude.or(self.exclude),
            output_dir: other.output_dir.or(self.output_dir),
            hash: other.hash.or(self.hash),
            hash_length: other.hash_length.or(self.hash_length),
            algorithm: other.algorithm.or(self.algorithm),
            format: other.format.or(self.format),
            announce: other.announce.or(self.announce),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standalone_file() {
        let config = LoaderConfig::from_toml_str(
            r#"
            include = ['\.node$']
            outputDir = "out"
            hash = false
            hashLength = 12
            algorithm = "sha256"
            format = "cjs"
            "#,
        )
        .unwrap();

        assert_eq!(config.include, Some(vec![r"\.node$".to_string()]));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.hash, Some(false));
        assert_eq!(config.hash_length, Some(12));
        assert_eq!(config.algorithm, Some(HashAlgorithm::Sha256));
        assert_eq!(config.format, Some(LoaderFormat::Cjs));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(LoaderConfig::from_toml_str("hsah = true").is_err());
    }

    #[test]
    fn reads_cargo_metadata_table() {
        let config = LoaderConfig::from_cargo_manifest_str(
            r#"
            [package]
            name = "app"
            version = "0.1.0"

            [package.metadata.addon-loader]
            hash_length = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.hash_length, Some(10));

        let empty = LoaderConfig::from_cargo_manifest_str("[package]\nname = \"app\"\n").unwrap();
        assert_eq!(empty, LoaderConfig::default());
    }

    #[test]
    fn invalid_metadata_table_names_the_table() {
        let err = LoaderConfig::from_cargo_manifest_str(
            "[package.metadata.addon-loader]\nhash = \"yes\"\n",
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("invalid [package.metadata.addon-loader] table: "));
    }

    #[test]
    fn algorithm_accepts_hyphenated_sha256() {
        let config = LoaderConfig::from_toml_str("algorithm = \"sha-256\"").unwrap();
        assert_eq!(config.algorithm, Some(HashAlgorithm::Sha256));
    }

    #[test]
    fn merge_prefers_overlay_values() {
        let file = LoaderConfig {
            hash_length: Some(10),
            hash: Some(true),
            ..Default::default()
        };
        let flags = LoaderConfig {
            hash: Some(false),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.hash, Some(false));
        assert_eq!(merged.hash_length, Some(10));
    }

    #[test]
    fn apply_feeds_builder() {
        let settings = LoaderConfig {
            hash_length: Some(6),
            format: Some(LoaderFormat::Cjs),
            ..Default::default()
        }
        .apply(LoaderSettingsBuilder::new())
        .build()
        .unwrap();
        assert_eq!(settings.hash_length(), 6);
        assert_eq!(settings.format(), LoaderFormat::Cjs);
    }
}
