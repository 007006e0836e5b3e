//! Operation: display the inheritance tree.

use blockyard_resolver::graph::InheritanceGraph;
use blockyard_util::errors::BlockyardError;

use crate::ops_load::Workspace;

/// Render the inheritance forest of the workspace.
pub fn tree(workspace: &Workspace) -> String {
    let graph = InheritanceGraph::from_registry(&workspace.registry);
    if graph.is_empty() {
        return "No blocks in workspace.\n".to_string();
    }
    graph.print_tree()
}

/// The inheritance chain of `name`, the block itself first, as display lines.
pub fn chain(workspace: &Workspace, name: &str) -> Result<Vec<String>, BlockyardError> {
    workspace.block(name)?;
    let graph = InheritanceGraph::from_registry(&workspace.registry);
    Ok(graph.chain(name).iter().map(|node| node.to_string()).collect())
}
