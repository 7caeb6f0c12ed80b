//! Per-build table of native addons observed during the reference phase.
//!
//! Keys are the artifact's original path. The first record stored for a key
//! wins; later attempts get the existing record back instead of replacing it.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Identity of one native addon within a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Path the artifact was referenced from. Unique within a build.
    pub original_path: PathBuf,
    /// File name without extension.
    pub base_name: String,
    /// Extension including the leading dot, or empty.
    pub extension: String,
    /// Truncated hex digest of the content when first observed.
    pub content_digest: String,
    /// Name of the emitted file.
    pub output_file_name: String,
    /// Where the emitted file is expected to land.
    pub output_path: PathBuf,
}

/// Outcome of [`AssetRegistry::put`].
#[derive(Debug, Clone)]
pub enum PutOutcome {
    /// The record was stored.
    Inserted(Arc<ArtifactRecord>),
    /// A record already existed for the key; it is returned unchanged.
    Existing(Arc<ArtifactRecord>),
}

impl PutOutcome {
    /// The record now held by the registry for the key.
    pub fn record(&self) -> &Arc<ArtifactRecord> {
        match self {
            PutOutcome::Inserted(r) | PutOutcome::Existing(r) => r,
        }
    }

    /// Whether this call stored the record.
    pub fn inserted(&self) -> bool {
        matches!(self, PutOutcome::Inserted(_))
    }
}

/// Thread-safe registry of [`ArtifactRecord`]s for a single build.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    entries: RwLock<BTreeMap<PathBuf, Arc<ArtifactRecord>>>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record exists for `key`.
    pub fn has(&self, key: &Path) -> bool {
        self.read().contains_key(key)
    }

    /// Stores `record` under `key` unless one is already present.
    pub fn put(&self, key: PathBuf, record: ArtifactRecord) -> PutOutcome {
        let mut entries = self.write();
        if let Some(existing) = entries.get(&key) {
            return PutOutcome::Existing(Arc::clone(existing));
        }
        let record = Arc::new(record);
        entries.insert(key, Arc::clone(&record));
        PutOutcome::Inserted(record)
    }

    /// Returns the record for `key`, if any.
    pub fn get(&self, key: &Path) -> Option<Arc<ArtifactRecord>> {
        self.read().get(key).cloned()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// All records, ordered by original path.
    pub fn all_entries(&self) -> Vec<Arc<ArtifactRecord>> {
        self.read().values().cloned().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true when no record is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Insert and clear are single map operations, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<PathBuf, Arc<ArtifactRecord>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<PathBuf, Arc<ArtifactRecord>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
