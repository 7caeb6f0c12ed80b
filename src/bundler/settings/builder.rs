//! Builder for constructing LoaderSettings.

use super::LoaderSettings;
use crate::{
    bail,
    bundler::{
        Result,
        filter::ReferenceFilter,
        fingerprint::{DEFAULT_HASH_LENGTH, HashAlgorithm},
        loader::LoaderFormat,
        naming::NamingPolicy,
    },
};
use std::path::{Path, PathBuf};

/// Builder for constructing [`LoaderSettings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_addon::bundler::{LoaderFormat, LoaderSettingsBuilder};
///
/// # fn example() -> kodegen_bundler_addon::bundler::Result<()> {
/// let settings = LoaderSettingsBuilder::new()
///     .exclude([r"/fixtures/"])
///     .hash(false)
///     .format(LoaderFormat::Cjs)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LoaderSettingsBuilder {
    include: Vec<String>,
    exclude: Vec<String>,
    output_dir: Option<PathBuf>,
    hash: bool,
    hash_length: usize,
    algorithm: HashAlgorithm,
    format: LoaderFormat,
    announce: bool,
}

impl Default for LoaderSettingsBuilder {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            output_dir: None,
            hash: true,
            hash_length: DEFAULT_HASH_LENGTH,
            algorithm: HashAlgorithm::default(),
            format: LoaderFormat::default(),
            announce: false,
        }
    }
}

impl LoaderSettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the include patterns (regular expressions over module ids).
    ///
    /// Default: `\.node$`
    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exclude patterns.
    ///
    /// Default: none
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output directory, overriding the host's.
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables or disables digests in output file names.
    ///
    /// Default: enabled
    pub fn hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    /// Sets the digest truncation length in hex characters.
    ///
    /// Default: 8
    pub fn hash_length(mut self, length: usize) -> Self {
        self.hash_length = length;
        self
    }

    /// Sets the digest algorithm.
    ///
    /// Default: md5
    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the loader module format.
    ///
    /// Default: esm
    pub fn format(mut self, format: LoaderFormat) -> Self {
        self.format = format;
        self
    }

    /// Makes generated loaders log the bound addon at startup.
    pub fn announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - a pattern does not compile
    /// - `hash_length` is zero or wider than the algorithm's digest
    pub fn build(self) -> Result<LoaderSettings> {
        if self.hash_length == 0 || self.hash_length > self.algorithm.hex_width() {
            bail!(
                "hash_length must be between 1 and {} for {}, got {}",
                self.algorithm.hex_width(),
                self.algorithm,
                self.hash_length
            );
        }

        let filter = ReferenceFilter::new(&self.include, &self.exclude)?;

        Ok(LoaderSettings::new(
            filter,
            self.output_dir,
            NamingPolicy {
                hash: self.hash,
                hash_length: self.hash_length,
                algorithm: self.algorithm,
            },
            self.format,
            self.announce,
        ))
    }
}
