//! Native addon bundling.
//!
//! Turns references to `.node` files into content-addressed output files
//! plus loader modules that bind the addon at program start.
//!
//! # Overview
//!
//! A build runs in two phases:
//! 1. For every claimed reference the [`ReferenceRewriter`] fingerprints the
//!    addon, fixes its output name, stores an [`ArtifactRecord`] in the
//!    [`AssetRegistry`] and returns loader source.
//! 2. Once, after the module graph is complete, the [`Emitter`] copies every
//!    recorded addon next to the generated code and registers it with the
//!    host's [`OutputManifest`].
//!
//! [`BuildSession`] ties the phases together and [`NodeAddonPlugin`] exposes
//! them through bundler hooks.
//!
//! # Module Organization
//!
//! - [`fingerprint`] - content digests
//! - [`naming`] - output file names
//! - [`registry`] - per-build record table
//! - [`filter`] - reference identification
//! - [`loader`] - loader source templates
//! - [`rewriter`] - per-reference phase
//! - [`emitter`] - end-of-build phase
//! - [`session`] - phase state machine
//! - [`plugin`] - host hooks
//! - [`manifest`] - output manifest sink
//! - [`settings`] - configuration

pub mod emitter;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod loader;
pub mod manifest;
pub mod naming;
pub mod plugin;
pub mod registry;
pub mod rewriter;
pub mod session;
pub mod settings;
pub mod utils;

pub use emitter::{EmitReport, EmittedAddon, Emitter, FailedAddon};
pub use error::{Context, Error, ErrorExt, Result};
pub use filter::ReferenceFilter;
pub use fingerprint::{HashAlgorithm, digest};
pub use loader::{LoadOutput, LoaderFormat, LoaderRenderer};
pub use manifest::{AssetManifest, ManifestEntry, OutputManifest};
pub use naming::NamingPolicy;
pub use plugin::{NodeAddonPlugin, PLUGIN_NAME};
pub use registry::{ArtifactRecord, AssetRegistry};
pub use rewriter::{ReferenceRewriter, Rewrite, Warning};
pub use session::{BuildSession, Phase};
pub use settings::{LoaderConfig, LoaderSettings, LoaderSettingsBuilder};
