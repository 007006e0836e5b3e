//! CLI argument definitions for Blockyard.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use blockyard_core::document::DocumentFormat;

#[derive(Parser, Debug)]
#[command(
    name = "blockyard",
    version,
    about = "Resolve, inspect and validate block workspaces",
    long_about = "Blockyard loads the blocks of a workspace, folds every block's `from` \
                  chain into it and checks the result, so the resolved configuration \
                  and actions of each block can be inspected before anything runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Workspace directory (default: nearest ancestor containing workspace.toml)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with individual blocks
    Blocks {
        #[command(subcommand)]
        action: BlocksAction,
    },

    /// List actions or plan their execution
    Actions {
        #[command(subcommand)]
        action: ActionsAction,
    },

    /// Show the inheritance tree of the workspace
    Tree,

    /// Resolve and validate the workspace, reporting every violation
    Validate,

    /// Print every resolved block of the workspace
    Inspect {
        /// Output format: json, toml or yaml
        #[arg(short, long)]
        format: Option<DocumentFormat>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BlocksAction {
    /// List all blocks
    List,
    /// Print one resolved block
    Inspect {
        name: String,
        /// Output format: json, toml or yaml
        #[arg(short, long)]
        format: Option<DocumentFormat>,
    },
    /// Show the inheritance chain of a block
    Chain { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ActionsAction {
    /// List the actions of one block, or of every non-template block
    List { block: Option<String> },
    /// Print the execution plan of an action
    Plan {
        block: String,
        action: String,
        /// Output format: json, toml or yaml
        #[arg(short, long)]
        format: Option<DocumentFormat>,
    },
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> Cli {
    Cli::parse()
}
