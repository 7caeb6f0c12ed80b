//! Output manifest registration.
//!
//! The host keeps its own record of emitted files. [`OutputManifest`] is how
//! the emitter tells it about every addon it wrote.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Host-provided sink for emitted assets.
pub trait OutputManifest {
    /// Declares an emitted asset named `file_name` with content `source`.
    fn emit_asset(&mut self, file_name: &str, source: Vec<u8>);
}

/// Entry of an [`AssetManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the content.
    pub sha256: String,
    #[serde(skip)]
    source: Vec<u8>,
}

impl ManifestEntry {
    /// Emitted bytes.
    pub fn source(&self) -> &[u8] {
        &self.source
    }
}

/// In-memory [`OutputManifest`], keyed and ordered by file name.
///
/// Serializes to JSON as `{ "<file name>": { "size": .., "sha256": .. } }`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AssetManifest {
    assets: BTreeMap<String, ManifestEntry>,
}

impl AssetManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `file_name`.
    pub fn get(&self, file_name: &str) -> Option<&ManifestEntry> {
        self.assets.get(file_name)
    }

    /// Iterates entries in file name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.assets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> crate::bundler::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl OutputManifest for AssetManifest {
    fn emit_asset(&mut self, file_name: &str, source: Vec<u8>) {
        let entry = ManifestEntry {
            size: source.len() as u64,
            sha256: hex::encode(Sha256::digest(&source)),
            source,
        };
        if self.assets.insert(file_name.to_string(), entry).is_some() {
            log::warn!("Asset {} was registered more than once", file_name);
        }
    }
}
