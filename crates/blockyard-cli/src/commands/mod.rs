//! Command dispatch and handler modules.

mod actions;
mod blocks;
mod inspect;
mod tree;
mod validate;

use std::path::{Path, PathBuf};

use miette::Result;

use blockyard_core::config::GlobalConfig;
use blockyard_core::document::DocumentFormat;
use blockyard_util::errors::BlockyardError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let start = start_dir(cli.workspace.as_deref())?;
    match cli.command {
        Command::Blocks { action } => blocks::exec(&start, action),
        Command::Actions { action } => actions::exec(&start, action),
        Command::Tree => tree::exec(&start),
        Command::Validate => validate::exec(&start),
        Command::Inspect { format } => inspect::exec(&start, format),
    }
}

/// Directory the workspace search starts from.
fn start_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir().map_err(BlockyardError::Io)?),
    }
}

/// The `--format` flag if given, else the `[output] format` from the global config.
fn output_format(explicit: Option<DocumentFormat>) -> DocumentFormat {
    explicit.unwrap_or_else(|| {
        GlobalConfig::load()
            .map(|c| c.output.format)
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring global config: {e}");
                DocumentFormat::default()
            })
    })
}
