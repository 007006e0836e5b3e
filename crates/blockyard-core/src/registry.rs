//! Insertion-ordered, name-indexed collection of blocks.

use std::collections::HashMap;
use std::fmt;

use blockyard_util::errors::BlockyardError;

use crate::block::Block;
use crate::merge::merge;

/// Stable index of a block inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All blocks of one workspace, in the order they were loaded.
///
/// Blocks are stored in an arena and addressed by [`BlockId`]; parent links
/// are ids into the same arena rather than references.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    blocks: Vec<Block>,
    /// Lookup from block name to arena index.
    index: HashMap<String, BlockId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block, or merge it into an existing block of the same name.
    ///
    /// On re-declaration the block loaded first wins every conflict; the new
    /// definition only fills gaps. A non-template re-declaration makes the
    /// block runnable. The surviving block is marked unresolved so the next
    /// resolver pass folds its parent chain in again.
    pub fn add(&mut self, block: Block) -> Result<BlockId, BlockyardError> {
        if let Some(&id) = self.index.get(&block.name) {
            tracing::debug!("Merging re-declared block '{}'", block.name);
            let existing = &mut self.blocks[id.0];
            merge(existing, &block)?;
            if !block.template {
                existing.template = false;
            }
            existing.resolved = false;
            return Ok(id);
        }

        let id = BlockId(self.blocks.len());
        // Nameless blocks are kept so validation can report each one.
        if !block.name.is_empty() {
            self.index.insert(block.name.clone(), id);
        }
        self.blocks.push(block);
        Ok(id)
    }

    /// Look up a block by exact name.
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.id_of(name).map(|id| &self.blocks[id.0])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Block> {
        let id = self.id_of(name)?;
        Some(&mut self.blocks[id.0])
    }

    pub fn id_of(&self, name: &str) -> Option<BlockId> {
        self.index.get(name).copied()
    }

    /// Resolve a `from`-style reference: `name` or `name:version`.
    ///
    /// The version part matches the block's version exactly, or as a semver
    /// requirement (`base:^1.2`) when both sides parse.
    pub fn find(&self, reference: &str) -> Option<BlockId> {
        let (name, version) = split_reference(reference);
        let id = self.id_of(name)?;
        match version {
            None => Some(id),
            Some(wanted) if version_matches(&self.blocks[id.0].version, wanted) => Some(id),
            Some(_) => None,
        }
    }

    /// The block stored at `id`.
    ///
    /// Ids are only handed out by this registry, so they are always in bounds.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }

    /// All blocks in insertion order.
    pub fn all(&self) -> &[Block] {
        &self.blocks
    }

    /// All block ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(BlockId)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks that have not been resolved yet.
    pub fn unresolved_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.resolved).count()
    }

    /// Walk `parent` links from `id` upwards, nearest ancestor first.
    pub fn ancestors(&self, id: BlockId) -> Vec<&Block> {
        let mut chain = Vec::new();
        let mut current = self.blocks[id.0].parent;
        while let Some(parent_id) = current {
            // Bounded by the arena size in case parent links form a loop.
            if chain.len() >= self.blocks.len() {
                break;
            }
            let parent = &self.blocks[parent_id.0];
            chain.push(parent);
            current = parent.parent;
        }
        chain
    }
}

/// Split `name:version` into its parts.
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once(':') {
        Some((name, version)) if !version.is_empty() => (name, Some(version)),
        Some((name, _)) => (name, None),
        None => (reference, None),
    }
}

fn version_matches(actual: &str, wanted: &str) -> bool {
    if actual == wanted {
        return true;
    }
    match (
        semver::Version::parse(actual),
        semver::VersionReq::parse(wanted),
    ) {
        (Ok(version), Ok(req)) => req.matches(&version),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn with_config(name: &str, json: &str) -> Block {
        let mut block = Block::new(name);
        block.config = serde_json::from_str(json).unwrap();
        block
    }

    #[test]
    fn add_then_get() {
        let mut registry = Registry::new();
        let id = registry.add(Block::new("base")).unwrap();
        assert_eq!(registry.get("base").unwrap().name, "base");
        assert_eq!(registry.id_of("base"), Some(id));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn redeclaration_first_loaded_wins() {
        let mut registry = Registry::new();
        registry.add(with_config("x", r#"{"a": 1}"#)).unwrap();
        registry.add(with_config("x", r#"{"a": 2, "b": 2}"#)).unwrap();

        assert_eq!(registry.len(), 1);
        let x = registry.get("x").unwrap();
        assert_eq!(x.config.get("a"), Some(&Value::Integer(1)));
        assert_eq!(x.config.get("b"), Some(&Value::Integer(2)));
    }

    #[test]
    fn redeclaration_marks_unresolved() {
        let mut registry = Registry::new();
        let id = registry.add(Block::new("x")).unwrap();
        registry.block_mut(id).resolved = true;
        registry.add(Block::new("x")).unwrap();
        assert!(!registry.block(id).resolved);
    }

    #[test]
    fn non_template_redeclaration_clears_template() {
        let mut template = Block::new("x");
        template.template = true;

        let mut registry = Registry::new();
        let id = registry.add(template.clone()).unwrap();
        registry.add(template).unwrap();
        assert!(registry.block(id).template);

        registry.add(Block::new("x")).unwrap();
        assert!(!registry.block(id).template);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut registry = Registry::new();
        for name in ["c", "a", "b"] {
            registry.add(Block::new(name)).unwrap();
        }
        let names: Vec<&str> = registry.all().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn nameless_blocks_are_not_merged() {
        let mut registry = Registry::new();
        registry.add(Block::default()).unwrap();
        registry.add(Block::default()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn find_with_version() {
        let mut registry = Registry::new();
        let mut base = Block::new("base");
        base.version = "1.4.2".into();
        let id = registry.add(base).unwrap();

        assert_eq!(registry.find("base"), Some(id));
        assert_eq!(registry.find("base:1.4.2"), Some(id));
        assert_eq!(registry.find("base:^1.2"), Some(id));
        assert_eq!(registry.find("base:2.0.0"), None);
        assert_eq!(registry.find("other"), None);
    }

    #[test]
    fn split_reference_forms() {
        assert_eq!(split_reference("base"), ("base", None));
        assert_eq!(split_reference("base:1.0"), ("base", Some("1.0")));
        assert_eq!(split_reference("base:"), ("base", None));
    }
}
