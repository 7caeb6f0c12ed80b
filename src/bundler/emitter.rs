//! End-of-build emission of recorded addons.
//!
//! Copies every registry record to the output directory and registers it
//! with the host manifest. A failure affects only the record it happened on.

use crate::bundler::{
    error::{Error, Result},
    fingerprint,
    manifest::OutputManifest,
    naming::NamingPolicy,
    registry::ArtifactRecord,
    utils::fs,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

/// An addon that was written to disk.
#[derive(Debug, Clone)]
pub struct EmittedAddon {
    /// Registry record that was emitted.
    pub record: Arc<ArtifactRecord>,
    /// Path actually written.
    pub path: PathBuf,
    /// Number of bytes written.
    pub size: u64,
}

/// An addon that could not be emitted.
#[derive(Debug)]
pub struct FailedAddon {
    /// Registry record that failed.
    pub record: Arc<ArtifactRecord>,
    /// Why it failed.
    pub error: Error,
}

/// Summary of one emission pass.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Output directory the pass wrote into.
    pub output_dir: PathBuf,
    /// Records written and registered.
    pub emitted: Vec<EmittedAddon>,
    /// Records whose output file was already written by an identical record.
    pub deduplicated: Vec<Arc<ArtifactRecord>>,
    /// Records that failed.
    pub failed: Vec<FailedAddon>,
}

impl EmitReport {
    /// Returns true if every record was emitted or deduplicated.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes recorded addons into a directory.
pub struct Emitter<'a> {
    output_dir: &'a Path,
    naming: &'a NamingPolicy,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter targeting `output_dir`.
    ///
    /// `naming` is used to re-check each addon's digest before copying.
    pub fn new(output_dir: &'a Path, naming: &'a NamingPolicy) -> Self {
        Self { output_dir, naming }
    }

    /// Emits every record, continuing past per-record failures.
    ///
    /// Records are placed in this emitter's directory first, so every
    /// reported record's `output_path` is the file that was written.
    pub async fn emit(
        &self,
        records: &[Arc<ArtifactRecord>],
        manifest: &mut dyn OutputManifest,
    ) -> EmitReport {
        let mut report = EmitReport {
            output_dir: self.output_dir.to_path_buf(),
            ..Default::default()
        };

        if records.is_empty() {
            return report;
        }
        let records: Vec<Arc<ArtifactRecord>> = records.iter().map(|r| self.placed(r)).collect();

        if let Err(error) = fs::create_dir_all(self.output_dir).await {
            log::error!("Failed to create {}: {}", self.output_dir.display(), error);
            // Nothing can be written; report every record against the same cause.
            let reason = error.to_string();
            report.failed = records
                .iter()
                .map(|record| FailedAddon {
                    record: Arc::clone(record),
                    error: Error::GenericError(reason.clone()),
                })
                .collect();
            return report;
        }

        // output file name -> record that claimed it in this pass
        let mut claimed: HashMap<&str, &Arc<ArtifactRecord>> = HashMap::new();

        for record in &records {
            if let Some(existing) = claimed.get(record.output_file_name.as_str()) {
                if existing.content_digest == record.content_digest {
                    log::debug!(
                        "{} has the same content as {}, already emitted as {}",
                        record.original_path.display(),
                        existing.original_path.display(),
                        record.output_file_name
                    );
                    report.deduplicated.push(Arc::clone(record));
                } else {
                    let error = Error::OutputCollision {
                        file_name: record.output_file_name.clone(),
                        existing: existing.original_path.clone(),
                    };
                    log::error!(
                        "Failed to copy node addon {}: {}",
                        record.original_path.display(),
                        error
                    );
                    report.failed.push(FailedAddon {
                        record: Arc::clone(record),
                        error,
                    });
                }
                continue;
            }

            match self.emit_one(record, manifest).await {
                Ok(emitted) => {
                    claimed.insert(record.output_file_name.as_str(), record);
                    report.emitted.push(emitted);
                }
                Err(error) => {
                    log::error!(
                        "Failed to copy node addon {}: {}",
                        record.original_path.display(),
                        error
                    );
                    report.failed.push(FailedAddon {
                        record: Arc::clone(record),
                        error,
                    });
                }
            }
        }

        report
    }

    fn placed(&self, record: &Arc<ArtifactRecord>) -> Arc<ArtifactRecord> {
        let output_path = self.output_dir.join(&record.output_file_name);
        if record.output_path == output_path {
            return Arc::clone(record);
        }
        log::debug!(
            "Placing {} in {} (recorded as {})",
            record.output_file_name,
            self.output_dir.display(),
            record.output_path.display()
        );
        Arc::new(ArtifactRecord {
            output_path,
            ..ArtifactRecord::clone(record)
        })
    }

    async fn emit_one(
        &self,
        record: &Arc<ArtifactRecord>,
        manifest: &mut dyn OutputManifest,
    ) -> Result<EmittedAddon> {
        let bytes = fs::read_file(&record.original_path).await?;

        let current = fingerprint::digest(&bytes, self.naming.algorithm, self.naming.hash_length);
        if current != record.content_digest {
            log::warn!(
                "{} changed since it was fingerprinted ({} -> {}); emitting under the original name {}",
                record.original_path.display(),
                record.content_digest,
                current,
                record.output_file_name
            );
        }

        let path = record.output_path.clone();
        fs::write_file(&path, &bytes).await?;

        let size = bytes.len() as u64;
        manifest.emit_asset(&record.output_file_name, bytes);

        log::info!(
            "Copied node addon: {} -> {}",
            record.original_path.display(),
            path.display()
        );

        Ok(EmittedAddon {
            record: Arc::clone(record),
            path,
            size,
        })
    }
}
