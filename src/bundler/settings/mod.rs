//! Configuration for the addon bundler.
//!
//! [`LoaderSettings`] is the validated, immutable configuration a build
//! session runs with. It is produced by [`LoaderSettingsBuilder`], either
//! directly or from a [`LoaderConfig`] read from TOML.

mod builder;
mod config;
mod core;

pub use builder::LoaderSettingsBuilder;
pub use config::LoaderConfig;
pub use core::LoaderSettings;
