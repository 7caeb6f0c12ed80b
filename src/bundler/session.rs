//! Two-phase build session.
//!
//! A session owns the registry for one build and enforces the order of its
//! phases:
//!
//! ```text
//! Idle --rewrite--> Collecting --close--> Closed --emit--> Emitting --> Done
//! ```
//!
//! `Done` is idle with an empty registry; only [`BuildSession::begin_build`]
//! leaves it. References may be rewritten concurrently while collecting.
//! Emission runs at most once per build and only after collection has been
//! closed.

use crate::bundler::{
    emitter::{EmitReport, Emitter},
    error::{Error, Result},
    loader::{LoadOutput, LoaderRenderer},
    manifest::OutputManifest,
    registry::{ArtifactRecord, AssetRegistry},
    rewriter::{ReferenceRewriter, Rewrite, Warning},
    settings::LoaderSettings,
};
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU8, Ordering},
    },
};

/// Phase of a [`BuildSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// No reference seen since the build started.
    Idle = 0,
    /// At least one reference has been rewritten.
    Collecting = 1,
    /// The host declared that no more references will arrive.
    Closed = 2,
    /// The emitter is running.
    Emitting = 3,
    /// Emission finished; waiting for the next build.
    Done = 4,
}

impl Phase {
    fn from_u8(value: u8) -> Phase {
        match value {
            0 => Phase::Idle,
            1 => Phase::Collecting,
            2 => Phase::Closed,
            3 => Phase::Emitting,
            _ => Phase::Done,
        }
    }

    /// Lowercase name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Collecting => "collecting",
            Phase::Closed => "closed",
            Phase::Emitting => "emitting",
            Phase::Done => "done",
        }
    }
}

/// State for one build, from the first reference to emission.
#[derive(Debug)]
pub struct BuildSession {
    settings: Arc<LoaderSettings>,
    renderer: LoaderRenderer,
    registry: AssetRegistry,
    phase: AtomicU8,
    host_out_dir: Mutex<Option<PathBuf>>,
    warnings: Mutex<Vec<Warning>>,
}

impl BuildSession {
    /// Creates an idle session with an empty registry.
    pub fn new(settings: Arc<LoaderSettings>) -> Result<Self> {
        let renderer = LoaderRenderer::new(settings.format(), settings.announce())?;
        Ok(Self {
            settings,
            renderer,
            registry: AssetRegistry::new(),
            phase: AtomicU8::new(Phase::Idle as u8),
            host_out_dir: Mutex::new(None),
            warnings: Mutex::new(Vec::new()),
        })
    }

    /// Settings this session runs with.
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Registry of the current build.
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Starts a new build, discarding everything from the previous one.
    ///
    /// `host_out_dir` is the host's resolved output directory, if it is
    /// already known.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPhase`] while an emission is running.
    pub fn begin_build(&self, host_out_dir: Option<&Path>) -> Result<()> {
        let previous = loop {
            let current = self.phase();
            if current == Phase::Emitting {
                return Err(invalid("begin a build", current));
            }
            if self.transition(current, Phase::Idle) {
                break current;
            }
        };
        self.registry.clear();
        lock(&self.warnings).clear();
        *lock(&self.host_out_dir) = host_out_dir.map(Path::to_path_buf);
        log::debug!("Addon build started (previous phase: {})", previous.as_str());
        Ok(())
    }

    /// Output directory records are currently resolved against.
    pub fn output_dir(&self) -> PathBuf {
        self.settings
            .resolve_output_dir(lock(&self.host_out_dir).as_deref())
    }

    /// Rewrites the reference `id`.
    ///
    /// Returns `None` when the addon does not exist; a warning is recorded
    /// and the reference is left to the host.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPhase`] once collection has been closed
    /// - reading or fingerprinting the addon failed
    pub async fn rewrite(&self, id: &str) -> Result<Option<LoadOutput>> {
        self.enter_collecting()?;

        let output_dir = self.output_dir();
        let rewriter =
            ReferenceRewriter::new(&self.settings, &self.registry, &self.renderer, &output_dir);

        match rewriter.rewrite(id).await? {
            Rewrite::Loaded { output, .. } => Ok(Some(output)),
            Rewrite::Declined(warning) => {
                lock(&self.warnings).push(warning);
                Ok(None)
            }
        }
    }

    /// Declares that no more references will be rewritten in this build.
    ///
    /// Idempotent once closed.
    pub fn close_collection(&self) -> Result<()> {
        loop {
            let current = self.phase();
            match current {
                Phase::Closed => return Ok(()),
                Phase::Emitting | Phase::Done => {
                    return Err(invalid("close collection", current));
                }
                Phase::Idle | Phase::Collecting => {
                    if self.transition(current, Phase::Closed) {
                        log::debug!("Addon collection closed with {} record(s)", self.registry.len());
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Emits every recorded addon, clears the registry and marks the build
    /// done.
    ///
    /// `host_out_dir` is the directory the host finally resolved; it is used
    /// unless the settings name one explicitly. Reported records carry the
    /// output path inside the directory actually written.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPhase`] unless collection is closed. This makes a
    /// second emission in the same build an error.
    pub async fn emit(
        &self,
        host_out_dir: Option<&Path>,
        manifest: &mut dyn OutputManifest,
    ) -> Result<EmitReport> {
        if !self.transition(Phase::Closed, Phase::Emitting) {
            return Err(invalid("emit", self.phase()));
        }

        let output_dir = match host_out_dir {
            Some(dir) => self.settings.resolve_output_dir(Some(dir)),
            None => self.output_dir(),
        };
        let records = self.registry.all_entries();
        log::debug!(
            "Emitting {} addon(s) into {}",
            records.len(),
            output_dir.display()
        );

        let report = Emitter::new(&output_dir, self.settings.naming())
            .emit(&records, manifest)
            .await;

        self.registry.clear();
        self.phase.store(Phase::Done as u8, Ordering::Release);
        Ok(report)
    }

    /// Warnings recorded during the current build.
    pub fn warnings(&self) -> Vec<Warning> {
        lock(&self.warnings).clone()
    }

    /// Record for `id`, if it was rewritten in the current build.
    pub fn record(&self, id: &str) -> Option<Arc<ArtifactRecord>> {
        self.registry
            .get(&crate::bundler::rewriter::registry_key(id))
    }

    fn enter_collecting(&self) -> Result<()> {
        loop {
            let current = self.phase();
            match current {
                Phase::Collecting => return Ok(()),
                Phase::Idle => {
                    if self.transition(Phase::Idle, Phase::Collecting) {
                        return Ok(());
                    }
                }
                Phase::Closed | Phase::Emitting | Phase::Done => {
                    return Err(invalid("rewrite a reference", current));
                }
            }
        }
    }

    fn transition(&self, from: Phase, to: Phase) -> bool {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

fn invalid(operation: &'static str, phase: Phase) -> Error {
    Error::InvalidPhase {
        operation,
        phase: phase.as_str(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
