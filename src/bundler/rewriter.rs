//! Per-reference rewriting of native addon imports.
//!
//! For each claimed id the rewriter fingerprints the addon, fixes its output
//! name, stores the record in the registry and returns loader source that
//! binds the addon lazily at program start.

use crate::bundler::{
    error::Result,
    filter::strip_query,
    fingerprint,
    loader::{LoadOutput, LoaderRenderer},
    naming::split_file_name,
    registry::{ArtifactRecord, AssetRegistry},
    settings::LoaderSettings,
    utils::fs,
};
use path_absolutize::Absolutize;
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Recoverable problem recorded while rewriting a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The referenced addon does not exist; the reference was declined.
    MissingSource {
        /// Id as the host passed it.
        id: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingSource { id } => write!(f, "Node addon file not found: {id}"),
        }
    }
}

/// Result of rewriting one reference.
#[derive(Debug, Clone)]
pub enum Rewrite {
    /// The reference is replaced by `output`.
    Loaded {
        /// Registry record backing the loader.
        record: Arc<ArtifactRecord>,
        /// Replacement module source.
        output: LoadOutput,
    },
    /// The reference was declined.
    Declined(Warning),
}

/// Normalizes a module id into the registry key for its addon.
///
/// Query suffixes are dropped and relative paths are made absolute against
/// the current directory, so `./a.node` and `/cwd/a.node` share one record.
pub fn registry_key(id: &str) -> PathBuf {
    let path = Path::new(strip_query(id));
    match path.absolutize() {
        Ok(absolute) => absolute.into_owned(),
        Err(e) => {
            log::debug!("Could not absolutize {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

/// Rewrites addon references for one build.
pub struct ReferenceRewriter<'a> {
    settings: &'a LoaderSettings,
    registry: &'a AssetRegistry,
    renderer: &'a LoaderRenderer,
    output_dir: &'a Path,
}

impl<'a> ReferenceRewriter<'a> {
    /// Creates a rewriter writing records into `registry`.
    ///
    /// `output_dir` is the directory recorded in each record's output path.
    pub fn new(
        settings: &'a LoaderSettings,
        registry: &'a AssetRegistry,
        renderer: &'a LoaderRenderer,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            settings,
            registry,
            renderer,
            output_dir,
        }
    }

    /// Rewrites the reference `id`.
    ///
    /// # Errors
    ///
    /// Reading or fingerprinting an existing addon failed. No record is
    /// stored in that case.
    pub async fn rewrite(&self, id: &str) -> Result<Rewrite> {
        let key = registry_key(id);

        if let Some(record) = self.registry.get(&key) {
            log::debug!(
                "Reusing {} for repeated reference {}",
                record.output_file_name,
                id
            );
            return self.loaded(record);
        }

        if !fs::is_file(&key).await {
            let warning = Warning::MissingSource { id: id.to_string() };
            log::warn!("{}", warning);
            return Ok(Rewrite::Declined(warning));
        }

        let naming = self.settings.naming();
        let content_digest =
            fingerprint::digest_file(&key, naming.algorithm, naming.hash_length).await?;

        let (base_name, extension) = split_file_name(&key);
        let output_file_name = naming.output_file_name(&base_name, &extension, &content_digest);
        let record = ArtifactRecord {
            output_path: self.output_dir.join(&output_file_name),
            original_path: key.clone(),
            base_name,
            extension,
            content_digest,
            output_file_name,
        };

        let outcome = self.registry.put(key, record);
        if outcome.inserted() {
            log::debug!(
                "Registered {} -> {}",
                outcome.record().original_path.display(),
                outcome.record().output_file_name
            );
        }
        self.loaded(Arc::clone(outcome.record()))
    }

    fn loaded(&self, record: Arc<ArtifactRecord>) -> Result<Rewrite> {
        let output = self.renderer.render(&record.output_file_name)?;
        Ok(Rewrite::Loaded { record, output })
    }
}
