//! Blockyard CLI binary.
//!
//! This is the entry point for the `blockyard` command-line tool. It
//! initializes logging via `tracing`, parses arguments with `clap`, and
//! dispatches to the appropriate command handler.

mod cli;
mod commands;

use miette::Result;
use tracing_subscriber::EnvFilter;

use blockyard_core::config::GlobalConfig;

fn main() -> Result<()> {
    let args = cli::parse();
    init_tracing(args.verbose);
    commands::dispatch(args)
}

/// `--verbose` forces `debug`; otherwise `RUST_LOG`, then the `[log] filter`
/// from the global config, then `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let configured = GlobalConfig::load().ok().and_then(|c| c.log.filter);
            EnvFilter::new(configured.as_deref().unwrap_or("warn"))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
