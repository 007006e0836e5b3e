//! Fixed-point resolution of `from` chains.
//!
//! Each pass walks the registry in insertion order and resolves every block
//! whose parent is already resolved, folding the parent's fields into the
//! child's gaps. A pass that resolves nothing while blocks remain means the
//! remaining `from` references form a cycle.

use blockyard_core::block::Block;
use blockyard_core::merge::merge;
use blockyard_core::registry::{BlockId, Registry};
use blockyard_util::errors::BlockyardError;

/// Statistics about a completed resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Number of passes over the registry.
    pub passes: usize,
    /// Number of blocks that changed from unresolved to resolved.
    pub resolved: usize,
}

/// Outcome of attempting a single block in one pass.
enum Step {
    Resolved,
    Deferred,
}

/// Resolve every unresolved block in `registry`.
///
/// Running this on an already resolved registry is a no-op. Any missing
/// parent, dependency cycle or merge shape conflict aborts the whole run.
pub fn resolve(registry: &mut Registry) -> Result<ResolutionSummary, BlockyardError> {
    let mut summary = ResolutionSummary::default();
    let mut remaining = registry.unresolved_count();
    let ids: Vec<BlockId> = registry.ids().collect();

    while remaining > 0 {
        summary.passes += 1;
        let at_start = remaining;
        tracing::debug!(
            "Resolution pass {}: {remaining} unresolved block(s)",
            summary.passes
        );

        for &id in &ids {
            if registry.block(id).resolved {
                continue;
            }
            if let Step::Resolved = resolve_block(registry, id)? {
                remaining -= 1;
                summary.resolved += 1;
            }
        }

        if remaining == at_start {
            let blocks: Vec<String> = registry
                .all()
                .iter()
                .filter(|b| !b.resolved)
                .map(|b| b.name.clone())
                .collect();
            tracing::debug!("No progress in pass {}, giving up", summary.passes);
            return Err(BlockyardError::CyclicDependency { blocks });
        }
    }

    Ok(summary)
}

fn resolve_block(registry: &mut Registry, id: BlockId) -> Result<Step, BlockyardError> {
    let block = registry.block(id);
    tracing::trace!("Resolving block '{}'", block.name);

    if !block.has_parent() {
        tracing::trace!("No dependency found for block '{}'", block.name);
        finish(registry.block_mut(id), None);
        return Ok(Step::Resolved);
    }

    let parent_id = registry
        .find(&block.from)
        .ok_or_else(|| BlockyardError::UnitNotFound {
            block: block.name.clone(),
            reference: block.from.clone(),
        })?;

    let parent = registry.block(parent_id);
    if !parent.resolved {
        tracing::trace!(
            "Dependency '{}' for block '{}' not yet resolved, deferring",
            block.from,
            block.name
        );
        return Ok(Step::Deferred);
    }

    let parent = parent.clone();
    let child = registry.block_mut(id);
    merge(child, &parent)?;
    // A child runs from the directory of the block it inherits from.
    if !parent.workdir.is_empty() {
        child.workdir.clone_from(&parent.workdir);
    }
    finish(child, Some(parent_id));
    tracing::trace!("Dependency '{}' for block '{}' resolved", parent.name, child.name);
    Ok(Step::Resolved)
}

fn finish(block: &mut Block, parent: Option<BlockId>) {
    for action in &mut block.actions {
        action.block.clone_from(&block.name);
    }
    block.parent = parent;
    block.resolved = true;
}
