//! Operation: render resolved blocks.

use serde::Serialize;

use blockyard_core::block::Block;
use blockyard_core::document::{render, DocumentFormat};

use crate::ops_load::Workspace;

/// One line of `blockyard blocks list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub name: String,
    pub version: String,
    pub from: String,
    pub template: bool,
    pub actions: usize,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            name: block.name.clone(),
            version: block.version.clone(),
            from: block.from.clone(),
            template: block.template,
            actions: block.actions.len(),
        }
    }
}

/// Top-level wrapper so every format, TOML included, gets a table at the root.
#[derive(Serialize)]
struct WorkspaceDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    blocks: &'a [Block],
}

/// Summaries of all blocks, in load order.
pub fn list(workspace: &Workspace) -> Vec<BlockSummary> {
    workspace.registry.all().iter().map(BlockSummary::from).collect()
}

/// Render one fully resolved block.
pub fn inspect_block(
    workspace: &Workspace,
    name: &str,
    format: DocumentFormat,
) -> miette::Result<String> {
    let block = workspace.block(name)?;
    render(block, format)
}

/// Render every resolved block of the workspace.
pub fn inspect_workspace(workspace: &Workspace, format: DocumentFormat) -> miette::Result<String> {
    let document = WorkspaceDocument {
        name: Some(workspace.config.name.as_str()).filter(|n| !n.is_empty()),
        blocks: workspace.registry.all(),
    };
    render(&document, format)
}
