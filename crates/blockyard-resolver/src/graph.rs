//! Inheritance graph over a resolved registry, for introspection.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use blockyard_core::registry::Registry;

/// A block as seen by the inheritance graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GraphNode {
    pub name: String,
    pub version: String,
    pub template: bool,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.version.is_empty() {
            write!(f, " v{}", self.version)?;
        }
        if self.template {
            write!(f, " (template)")?;
        }
        Ok(())
    }
}

/// Parent → child edges between the blocks of one workspace.
pub struct InheritanceGraph {
    graph: DiGraph<GraphNode, ()>,
    /// Lookup from block name to node index.
    index: HashMap<String, NodeIndex>,
}

impl InheritanceGraph {
    /// Build the graph from parent links, falling back to `from` references
    /// for blocks that have not been resolved.
    pub fn from_registry(registry: &Registry) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for block in registry.all().iter().filter(|b| !b.name.is_empty()) {
            let idx = graph.add_node(GraphNode {
                name: block.name.clone(),
                version: block.version.clone(),
                template: block.template,
            });
            index.insert(block.name.clone(), idx);
        }

        for block in registry.all().iter().filter(|b| !b.name.is_empty()) {
            let parent = block
                .parent
                .or_else(|| block.has_parent().then(|| registry.find(&block.from)).flatten())
                .map(|id| registry.block(id).name.as_str());
            if let Some(parent_name) = parent {
                if let (Some(&from), Some(&to)) = (index.get(parent_name), index.get(&block.name)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self { graph, index }
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Blocks that inherit from nothing, in registry order.
    pub fn roots(&self) -> Vec<&GraphNode> {
        self.root_indices()
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Blocks declaring `from: <name>`, in registry order.
    pub fn children_of(&self, name: &str) -> Vec<&GraphNode> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        self.child_indices(idx)
            .into_iter()
            .map(|child| &self.graph[child])
            .collect()
    }

    /// The inheritance chain of a block: the block itself, then each ancestor up to its root.
    pub fn chain(&self, name: &str) -> Vec<&GraphNode> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.index.get(name).copied();
        while let Some(idx) = current {
            if !visited.insert(idx) {
                break;
            }
            chain.push(&self.graph[idx]);
            current = self.parent_of(idx);
        }
        chain
    }

    /// Print the inheritance forest, one root per top-level entry.
    pub fn print_tree(&self) -> String {
        let mut output = String::new();
        let mut visited = HashSet::new();
        for root in self.root_indices() {
            output.push_str(&format!("{}\n", self.graph[root]));
            visited.insert(root);
            let children = self.child_indices(root);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate() {
                self.print_subtree(&mut output, child, "", i == count - 1, &mut visited);
            }
            visited.remove(&root);
        }
        output
    }

    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.child_indices(idx);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(output, child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    fn root_indices(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.parent_of(idx).is_none())
            .collect()
    }

    fn parent_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .next()
    }

    fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect();
        children.sort();
        children
    }
}
