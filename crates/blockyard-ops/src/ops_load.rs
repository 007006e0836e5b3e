//! Operation: load a workspace.
//!
//! Reads `workspace.toml`, registers its inline blocks, discovers block
//! documents under the blocks root, then resolves and validates the whole
//! registry. Any failure aborts the load; no partially resolved workspace is
//! ever handed out.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use blockyard_core::block::Block;
use blockyard_core::config::{WorkspaceConfig, WorkspaceFile, SCHEMA_FILE, WORKSPACE_FILE};
use blockyard_core::document::load_block;
use blockyard_core::registry::Registry;
use blockyard_resolver::resolver::{resolve, ResolutionSummary};
use blockyard_resolver::validate::{validate, ValidationReport};
use blockyard_util::errors::BlockyardError;

/// A loaded, resolved workspace.
#[derive(Debug)]
pub struct Workspace {
    /// Directory containing `workspace.toml`.
    pub root: PathBuf,
    pub config: WorkspaceConfig,
    pub registry: Registry,
    pub summary: ResolutionSummary,
}

impl Workspace {
    /// Look up a block by name, failing with [`BlockyardError::BlockNotFound`].
    pub fn block(&self, name: &str) -> Result<&Block, BlockyardError> {
        self.registry
            .get(name)
            .ok_or_else(|| BlockyardError::BlockNotFound {
                name: name.to_string(),
            })
    }
}

/// Find the workspace root: `start` or its nearest ancestor holding `workspace.toml`.
pub fn find_root(start: &Path) -> Result<PathBuf, BlockyardError> {
    blockyard_util::fs::find_ancestor_with(start, WORKSPACE_FILE).ok_or_else(|| {
        BlockyardError::Config {
            message: format!(
                "No {WORKSPACE_FILE} found in {} or any parent directory",
                start.display()
            ),
        }
    })
}

/// Load, resolve and validate the workspace containing `start`.
pub fn load(start: &Path) -> miette::Result<Workspace> {
    let workspace = load_unchecked(start)?;
    check(&workspace).into_result()?;
    Ok(workspace)
}

/// Run every structural check over a loaded workspace.
pub fn check(workspace: &Workspace) -> ValidationReport {
    validate(&workspace.registry)
}

/// Load and resolve the workspace containing `start` without validating it.
pub fn load_unchecked(start: &Path) -> miette::Result<Workspace> {
    let root = find_root(start)?;
    let file = WorkspaceFile::from_path(&root.join(WORKSPACE_FILE))?;
    let config = file.workspace;

    let mut registry = Registry::new();
    for block in file.blocks {
        registry.add(block)?;
    }
    let inline = registry.len();

    let documents = discover(&root, &config)?;
    for path in &documents {
        tracing::debug!("Loading block document {}", path.display());
        let mut block = load_block(path)?;
        attach_workdir(&mut block, &root, &config, path);
        registry.add(block)?;
    }
    tracing::debug!(
        "Registered {} block(s): {inline} inline, {} document(s)",
        registry.len(),
        documents.len()
    );

    blockyard_util::progress::status(
        "Loaded",
        &format!(
            "{} block(s) from {}",
            registry.len(),
            workspace_label(&config, &root)
        ),
    );

    let summary = resolve(&mut registry)?;
    blockyard_util::progress::status(
        "Resolved",
        &format!(
            "{} block(s) in {} pass(es)",
            summary.resolved, summary.passes
        ),
    );

    Ok(Workspace {
        root,
        config,
        registry,
        summary,
    })
}

/// Block documents under the blocks root, in a stable walk order.
pub fn discover(root: &Path, config: &WorkspaceConfig) -> Result<Vec<PathBuf>, BlockyardError> {
    let blocks_root = root.join(&config.blocks_root);
    if !blocks_root.is_dir() {
        tracing::debug!("Blocks root {} does not exist", blocks_root.display());
        return Ok(Vec::new());
    }

    let excludes = build_excludes(&config.exclude)?;
    let mut documents = Vec::new();

    for entry in WalkDir::new(&blocks_root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry.map_err(|e| BlockyardError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(&blocks_root).unwrap_or(path);
        if excludes.is_match(rel) {
            tracing::trace!("Excluded {}", rel.display());
            continue;
        }
        let is_block_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| config.block_files.iter().any(|f| f == n));
        if is_block_file {
            documents.push(path.to_path_buf());
        }
    }

    Ok(documents)
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, BlockyardError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| BlockyardError::Config {
            message: format!("Invalid exclude pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| BlockyardError::Config {
        message: format!("Invalid exclude patterns: {e}"),
    })
}

/// Point an unset workdir at the document's directory on the host and at the
/// same relative location below the container root, and pick up a
/// `schema.json` lying next to the document.
fn attach_workdir(block: &mut Block, root: &Path, config: &WorkspaceConfig, document: &Path) {
    let Some(dir) = document.parent() else {
        return;
    };
    let schema = dir.join(SCHEMA_FILE);
    if block.schema.is_none() && schema.is_file() {
        block.schema = Some(schema);
    }
    if block.workdir.local_path.is_none() {
        block.workdir.local_path = Some(dir.to_path_buf());
    }
    if block.workdir.container_path.is_none() {
        let rel = dir.strip_prefix(root).unwrap_or(dir);
        block.workdir.container_path = Some(Path::new(&config.container_root).join(rel));
    }
}

fn workspace_label(config: &WorkspaceConfig, root: &Path) -> String {
    if config.name.is_empty() {
        root.display().to_string()
    } else {
        format!("workspace '{}'", config.name)
    }
}
