//! Host build tool integration.
//!
//! [`NodeAddonPlugin`] exposes the session through the hooks a bundler host
//! calls: `build_start` once per build, `resolve_id` and `load` for every
//! module id, and `generate_bundle` once after the module graph is done.

use crate::bundler::{
    emitter::EmitReport,
    error::Result,
    filter::strip_query,
    loader::LoadOutput,
    manifest::OutputManifest,
    session::BuildSession,
    settings::LoaderSettings,
};
use std::{path::Path, sync::Arc};

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "vite:node-addon-loader";

/// Native addon loader plugin.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_addon::bundler::{AssetManifest, LoaderSettingsBuilder, NodeAddonPlugin};
/// use std::path::Path;
///
/// # async fn example() -> kodegen_bundler_addon::bundler::Result<()> {
/// let plugin = NodeAddonPlugin::new(LoaderSettingsBuilder::new().build()?)?;
/// plugin.build_start(Some(Path::new("dist")))?;
///
/// if let Some(id) = plugin.resolve_id("./native/addon.node") {
///     if let Some(loaded) = plugin.load(&id).await? {
///         println!("{}", loaded.code);
///     }
/// }
///
/// let mut manifest = AssetManifest::new();
/// let report = plugin.generate_bundle(None, &mut manifest).await?;
/// println!("emitted {} addon(s)", report.emitted.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NodeAddonPlugin {
    session: Arc<BuildSession>,
}

impl NodeAddonPlugin {
    /// Creates the plugin with its own build session.
    pub fn new(settings: LoaderSettings) -> Result<Self> {
        Ok(Self {
            session: Arc::new(BuildSession::new(Arc::new(settings))?),
        })
    }

    /// Plugin name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Session backing this plugin.
    pub fn session(&self) -> &Arc<BuildSession> {
        &self.session
    }

    /// Start of a build. Clears all state left by the previous build.
    pub fn build_start(&self, host_out_dir: Option<&Path>) -> Result<()> {
        self.session.begin_build(host_out_dir)
    }

    /// Claims `id` if it names a native addon. Pure.
    pub fn resolve_id(&self, id: &str) -> Option<String> {
        self.session
            .settings()
            .filter()
            .matches(id)
            .then(|| strip_query(id).to_string())
    }

    /// Produces the loader module replacing `id`.
    ///
    /// Unclaimed ids and missing addons yield `None`.
    pub async fn load(&self, id: &str) -> Result<Option<LoadOutput>> {
        if !self.session.settings().filter().matches(id) {
            return Ok(None);
        }
        self.session.rewrite(id).await
    }

    /// End of the build: copies every recorded addon into the output
    /// directory and registers it with `manifest`.
    pub async fn generate_bundle(
        &self,
        host_out_dir: Option<&Path>,
        manifest: &mut dyn OutputManifest,
    ) -> Result<EmitReport> {
        self.session.close_collection()?;
        self.session.emit(host_out_dir, manifest).await
    }
}
