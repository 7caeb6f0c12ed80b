//! Core LoaderSettings struct and implementations.

use crate::bundler::{
    filter::ReferenceFilter,
    fingerprint::HashAlgorithm,
    loader::LoaderFormat,
    naming::NamingPolicy,
};
use std::path::{Path, PathBuf};

/// Output directory used when neither the configuration nor the host names one.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Settings for a native addon bundling session.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_addon::bundler::LoaderSettingsBuilder;
///
/// # fn example() -> kodegen_bundler_addon::bundler::Result<()> {
/// let settings = LoaderSettingsBuilder::new()
///     .include([r"\.node$"])
///     .output_dir("dist")
///     .hash_length(8)
///     .build()?;
/// assert!(settings.filter().matches("/app/addon.node"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LoaderSettings {
    /// Compiled include/exclude patterns.
    filter: ReferenceFilter,

    /// Explicit output directory.
    ///
    /// Takes precedence over whatever directory the host resolves.
    output_dir: Option<PathBuf>,

    /// How output file names are derived.
    naming: NamingPolicy,

    /// Module format of generated loaders.
    format: LoaderFormat,

    /// Whether loaders log the addon they bound at startup.
    announce: bool,
}

impl LoaderSettings {
    /// Returns the reference filter.
    pub fn filter(&self) -> &ReferenceFilter {
        &self.filter
    }

    /// Returns the explicitly configured output directory, if any.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Resolves the output directory against the host's directory.
    ///
    /// Explicit configuration wins, then the host's directory, then `dist`.
    pub fn resolve_output_dir(&self, host_out_dir: Option<&Path>) -> PathBuf {
        self.output_dir
            .as_deref()
            .or(host_out_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Returns the naming policy.
    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Returns true when output names carry a content digest.
    pub fn hash(&self) -> bool {
        self.naming.hash
    }

    /// Returns the digest truncation length.
    pub fn hash_length(&self) -> usize {
        self.naming.hash_length
    }

    /// Returns the digest algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.naming.algorithm
    }

    /// Returns the loader module format.
    pub fn format(&self) -> LoaderFormat {
        self.format
    }

    /// Returns whether loaders announce themselves at startup.
    pub fn announce(&self) -> bool {
        self.announce
    }

    /// Creates a new LoaderSettings instance (used by LoaderSettingsBuilder).
    pub(super) fn new(
        filter: ReferenceFilter,
        output_dir: Option<PathBuf>,
        naming: NamingPolicy,
        format: LoaderFormat,
        announce: bool,
    ) -> Self {
        Self {
            filter,
            output_dir,
            naming,
            format,
            announce,
        }
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self::new(
            ReferenceFilter::default(),
            None,
            NamingPolicy::default(),
            LoaderFormat::default(),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_output_dir_wins() {
        let settings = LoaderSettings::new(
            ReferenceFilter::default(),
            Some(PathBuf::from("out/native")),
            NamingPolicy::default(),
            LoaderFormat::Esm,
            false,
        );
        assert_eq!(
            settings.resolve_output_dir(Some(Path::new("build"))),
            PathBuf::from("out/native")
        );
    }

    #[test]
    fn falls_back_to_host_then_dist() {
        let settings = LoaderSettings::default();
        assert_eq!(
            settings.resolve_output_dir(Some(Path::new("build"))),
            PathBuf::from("build")
        );
        assert_eq!(settings.resolve_output_dir(None), PathBuf::from("dist"));
    }
}
