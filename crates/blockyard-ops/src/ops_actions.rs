//! Operation: list actions and plan their execution.
//!
//! Nothing is executed here. A plan carries everything an external runner
//! needs: the script, the environment and the mounts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use blockyard_core::block::{Block, Workdir};
use blockyard_util::errors::BlockyardError;

use crate::ops_load::Workspace;

/// An action as listed by `blockyard actions list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEntry {
    pub block: String,
    pub action: String,
    pub description: String,
}

/// Everything needed to run one action of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub block: String,
    pub action: String,
    pub script: Vec<String>,
    pub interactive: bool,
    pub env: BTreeMap<String, String>,
    pub mounts: Vec<String>,
    #[serde(skip_serializing_if = "Workdir::is_empty")]
    pub workdir: Workdir,
}

/// Actions of one block, or of every runnable block when `block` is `None`.
pub fn list(workspace: &Workspace, block: Option<&str>) -> Result<Vec<ActionEntry>, BlockyardError> {
    let blocks: Vec<&Block> = match block {
        Some(name) => vec![workspace.block(name)?],
        None => workspace
            .registry
            .all()
            .iter()
            .filter(|b| !b.template)
            .collect(),
    };

    Ok(blocks
        .into_iter()
        .flat_map(|b| {
            b.actions.iter().map(move |a| ActionEntry {
                block: b.name.clone(),
                action: a.name.clone(),
                description: a.description.clone(),
            })
        })
        .collect())
}

/// Build the execution plan for `block`'s action `action`.
pub fn plan(workspace: &Workspace, block: &str, action: &str) -> Result<ActionPlan, BlockyardError> {
    let target = workspace.block(block)?;
    if target.template {
        return Err(BlockyardError::Generic {
            message: format!("Block '{block}' is a template and cannot be run"),
        });
    }
    let found = target
        .action(action)
        .ok_or_else(|| BlockyardError::ActionNotFound {
            block: block.to_string(),
            action: action.to_string(),
        })?;

    let mut env = BTreeMap::new();
    env.insert(
        "BLOCKYARD_WORKSPACE".to_string(),
        workspace.config.container_root.clone(),
    );
    env.insert("BLOCKYARD_BLOCK".to_string(), target.name.clone());
    if let Some(path) = &target.workdir.container_path {
        env.insert("BLOCKYARD_BLOCK_WORKDIR".to_string(), path_string(path));
    }
    env.insert("BLOCKYARD_ACTION".to_string(), found.name.clone());
    env.extend(found.env.iter().map(|(k, v)| (k.clone(), v.clone())));

    let mut mounts = Vec::new();
    if let (Some(local), Some(container)) =
        (&target.workdir.local_path, &target.workdir.container_path)
    {
        mounts.push(format!("{}:{}", path_string(local), path_string(container)));
    }
    mounts.extend(found.mounts.iter().cloned());

    tracing::debug!(
        "Planned action '{}' of block '{}' ({} step(s))",
        found.name,
        target.name,
        found.script.len()
    );

    Ok(ActionPlan {
        block: target.name.clone(),
        action: found.name.clone(),
        script: found.script.clone(),
        interactive: found.is_interactive(),
        env,
        mounts,
        workdir: target.workdir.clone(),
    })
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
