//! Command line interface for the addon bundler.
//!
//! The CLI plays the part of a bundler host: it finds addon references,
//! runs the per-reference phase for all of them concurrently, writes the
//! generated loaders, then runs the emitter once and writes a manifest.

mod args;
mod scan;

pub use args::Args;
pub use scan::collect_references;

use crate::{
    bundler::{
        AssetManifest, LoaderConfig, LoaderSettings, LoaderSettingsBuilder, NodeAddonPlugin,
        utils::fs,
    },
    error::{BundlerError, CliError, Result},
};
use std::{path::PathBuf, sync::Arc};
use tokio::task::JoinSet;

/// Default manifest file name inside the addon directory.
pub const MANIFEST_FILE_NAME: &str = "addon-manifest.json";

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "addon-loader.toml";

/// Initializes `env_logger`, honoring `RUST_LOG` over the verbosity flag.
pub fn init_logging(args: &Args) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();
}

/// Main CLI entry point. Returns the process exit code.
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let settings = load_settings(&args).await?;
    let ids = collect_references(&args.inputs, settings.filter());
    if ids.is_empty() {
        return Err(CliError::NoReferences {
            inputs: args
                .inputs
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
        .into());
    }

    let plugin = Arc::new(NodeAddonPlugin::new(settings)?);
    plugin.build_start(Some(&args.out_dir))?;
    let loader_dir = plugin.session().output_dir();
    let extension = plugin.session().settings().format().module_extension();

    // Per-reference phase
    let mut tasks = JoinSet::new();
    for id in ids {
        let plugin = Arc::clone(&plugin);
        let loader_dir = loader_dir.clone();
        tasks.spawn(async move {
            let outcome = write_loader(&plugin, &id, &loader_dir, extension).await;
            (id, outcome)
        });
    }

    let mut loaders = Vec::new();
    let mut reference_failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (id, outcome) = joined.map_err(|e| CliError::ExecutionFailed {
            command: "load".to_string(),
            reason: format!("Reference task panicked: {}", e),
        })?;
        match outcome {
            Ok(Some(path)) => loaders.push(path),
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to load node addon: {}: {}", id, e);
                reference_failures += 1;
            }
        }
    }
    loaders.sort();
    loaders.dedup();

    let warnings = plugin.session().warnings();

    // End-of-build phase
    let mut manifest = AssetManifest::new();
    let report = plugin
        .generate_bundle(Some(&args.out_dir), &mut manifest)
        .await?;

    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| report.output_dir.join(MANIFEST_FILE_NAME));
    fs::write_file(&manifest_path, manifest.to_json()?.as_bytes()).await?;

    for emitted in &report.emitted {
        println!(
            "✓ {} -> {} ({} bytes)",
            emitted.record.original_path.display(),
            emitted.path.display(),
            emitted.size
        );
    }
    for loader in &loaders {
        println!("  loader: {}", loader.display());
    }
    for warning in &warnings {
        println!("⚠ {}", warning);
    }
    for failed in &report.failed {
        println!(
            "✗ {}: {}",
            failed.record.original_path.display(),
            failed.error
        );
    }
    println!("  manifest: {}", manifest_path.display());

    let failed = reference_failures + report.failed.len();
    if failed > 0 || (args.strict && !warnings.is_empty()) {
        return Ok(1);
    }
    Ok(0)
}

/// Builds settings from the configuration file and command line overrides.
async fn load_settings(args: &Args) -> Result<LoaderSettings> {
    let file_config = match &args.config {
        Some(path) => LoaderConfig::load(path).await?,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if fs::is_file(&default).await {
                LoaderConfig::load(&default).await?
            } else {
                LoaderConfig::default()
            }
        }
    };

    let config = file_config.merge(args.config_overrides());
    config
        .apply(LoaderSettingsBuilder::new())
        .build()
        .map_err(BundlerError::from)
}

/// Loads `id` and writes its loader module into `loader_dir`.
///
/// Returns the loader path, or `None` if the reference was declined.
async fn write_loader(
    plugin: &NodeAddonPlugin,
    id: &str,
    loader_dir: &std::path::Path,
    extension: &str,
) -> crate::bundler::Result<Option<PathBuf>> {
    let Some(loaded) = plugin.load(id).await? else {
        return Ok(None);
    };
    let Some(record) = plugin.session().record(id) else {
        return Ok(None);
    };

    let path = loader_dir.join(format!("{}.{}", record.output_file_name, extension));
    fs::write_file(&path, loaded.code.as_bytes()).await?;
    log::debug!("Wrote loader {}", path.display());
    Ok(Some(path))
}
