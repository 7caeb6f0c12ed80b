//! Kodegen Bundler Addon - native addon bundler for Node.js builds.
//!
//! This binary copies `.node` addons into a build output directory under
//! content-hashed names and writes a loader module next to each one.

use kodegen_bundler_addon::cli;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse_args();

    // Initialize logging
    cli::init_logging(&args);

    // Run CLI and get exit code
    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
