//! FastForge
//!
//! Entity-driven scaffolding engine for FastAPI projects.
//!
//! This is the main entry point for the command-line interface.

use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = forge_cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
