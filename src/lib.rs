//! Native addon bundling library.
//!
//! This library provides the pieces a bundler needs to ship Node.js native
//! addons (`.node` files) alongside generated code:
//! - content fingerprints and hashed output names
//! - loader modules that require the addon relative to their own location
//! - a once-per-build emitter that copies addons into the output directory
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
