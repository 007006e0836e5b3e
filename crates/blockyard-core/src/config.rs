use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use blockyard_util::errors::BlockyardError;

use crate::block::Block;
use crate::document::DocumentFormat;

/// File name marking the root of a workspace.
pub const WORKSPACE_FILE: &str = "workspace.toml";

/// JSON Schema for a block's `config`, looked up next to each block document.
pub const SCHEMA_FILE: &str = "schema.json";

/// The parsed representation of a `workspace.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceFile {
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Blocks declared inline. They are loaded before discovered block
    /// documents and therefore win every merge conflict with them.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Workspace settings from the `[workspace]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub name: String,

    /// Directory, relative to the workspace root, scanned for block documents.
    #[serde(default = "default_blocks_root", rename = "blocks-root")]
    pub blocks_root: String,

    /// File names recognised as block documents.
    #[serde(default = "default_block_files", rename = "block-files")]
    pub block_files: Vec<String>,

    /// Glob patterns (relative to the blocks root) skipped during discovery.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Path the workspace is mounted at inside an execution container.
    #[serde(default = "default_container_root", rename = "container-root")]
    pub container_root: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            blocks_root: default_blocks_root(),
            block_files: default_block_files(),
            exclude: Vec::new(),
            container_root: default_container_root(),
        }
    }
}

fn default_blocks_root() -> String {
    "blocks".to_string()
}

fn default_block_files() -> Vec<String> {
    ["block.toml", "block.poly", "block.yml", "block.yaml"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_container_root() -> String {
    "/workspace".to_string()
}

impl WorkspaceFile {
    /// Load and parse a `workspace.toml` file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BlockyardError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a `workspace.toml` from a string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            BlockyardError::Config {
                message: format!("Failed to parse workspace.toml: {e}"),
            }
            .into()
        })
    }
}

/// Global user configuration loaded from `~/.blockyard/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Output settings from `[output]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: DocumentFormat,
}

/// Logging settings from `[log]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter when `RUST_LOG` is not set (e.g. `blockyard=debug`).
    #[serde(default)]
    pub filter: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| BlockyardError::Config {
                message: format!("Failed to read global config: {e}"),
            })?;
            toml::from_str(&content).map_err(|e| {
                BlockyardError::Config {
                    message: format!("Failed to parse global config: {e}"),
                }
                .into()
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the Blockyard data directory (`~/.blockyard/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".blockyard")
}
