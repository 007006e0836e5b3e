use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::registry::BlockId;
use crate::value::Value;

/// A deployable unit: configuration plus executable actions, optionally
/// inheriting both from another block named in `from`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,

    /// Name (optionally `name:version`) of the block this one inherits from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,

    /// A template is never executed directly; it only exists to be inherited from.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub template: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Workdir::is_empty")]
    pub workdir: Workdir,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,

    /// JSON Schema the resolved `config` must satisfy, found next to the block document.
    #[serde(skip)]
    pub schema: Option<PathBuf>,

    /// Set once the `from` chain has been folded into this block.
    #[serde(skip)]
    pub resolved: bool,

    /// The block this one was resolved from, as an index into its registry.
    #[serde(skip)]
    pub parent: Option<BlockId>,
}

/// A named, scriptable sub-procedure attached to a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Command lines, executed in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Extra `host:container` mounts the action needs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<String>,

    /// Name of the block that owns this action after resolution.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block: String,
}

/// Where a block's files live on the host and inside an execution container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workdir {
    #[serde(default, rename = "local-path", skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    #[serde(
        default,
        rename = "container-path",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_path: Option<PathBuf>,
}

impl Workdir {
    pub fn is_empty(&self) -> bool {
        self.local_path.is_none() && self.container_path.is_none()
    }
}

impl Block {
    /// Create an empty, unresolved block with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if this block declares a parent via `from`.
    pub fn has_parent(&self) -> bool {
        !self.from.is_empty()
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.name == name)
    }
}

impl Action {
    pub fn new(name: impl Into<String>, script: Vec<String>) -> Self {
        Self {
            name: name.into(),
            script,
            ..Self::default()
        }
    }

    /// Whether the action needs an attached terminal. Defaults to `false`.
    pub fn is_interactive(&self) -> bool {
        self.interactive.unwrap_or(false)
    }
}
