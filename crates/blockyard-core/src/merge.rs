//! Directional, non-destructive deep merge.
//!
//! Values already present in the destination always win; the source only
//! fills gaps. Both load-time re-declaration and `from` inheritance go through
//! [`Merge::merge_from`] on [`Block`].

use std::collections::BTreeMap;

use blockyard_util::errors::BlockyardError;

use crate::block::{Action, Block};
use crate::value::Value;

/// Fill the gaps in `self` from `src` without overwriting anything `self` declares.
///
/// `path` is the dotted location of `self` within the enclosing document and
/// is only used to report shape conflicts.
pub trait Merge {
    fn merge_from(&mut self, src: &Self, path: &str) -> Result<(), BlockyardError>;
}

/// Merge `src` into `dst` starting from the document root.
pub fn merge<T: Merge>(dst: &mut T, src: &T) -> Result<(), BlockyardError> {
    dst.merge_from(src, "")
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

impl Merge for Value {
    fn merge_from(&mut self, src: &Self, path: &str) -> Result<(), BlockyardError> {
        if self.is_null() {
            *self = src.clone();
            return Ok(());
        }
        match (self, src) {
            (Value::Map(dst), Value::Map(src)) => dst.merge_from(src, path),
            (_, Value::Null) => Ok(()),
            (dst, src) if dst.is_map() != src.is_map() => Err(BlockyardError::MergeShape {
                path: path.to_string(),
                dst: dst.kind(),
                src: src.kind(),
            }),
            // Scalars and lists: the destination is kept as-is.
            _ => Ok(()),
        }
    }
}

impl<V: Merge + Clone> Merge for BTreeMap<String, V> {
    fn merge_from(&mut self, src: &Self, path: &str) -> Result<(), BlockyardError> {
        for (key, src_value) in src {
            match self.get_mut(key) {
                Some(dst_value) => dst_value.merge_from(src_value, &join_path(path, key))?,
                None => {
                    self.insert(key.clone(), src_value.clone());
                }
            }
        }
        Ok(())
    }
}

/// An empty string counts as absent.
impl Merge for String {
    fn merge_from(&mut self, src: &Self, _path: &str) -> Result<(), BlockyardError> {
        if self.is_empty() && !src.is_empty() {
            self.clone_from(src);
        }
        Ok(())
    }
}

/// Lists are a single value: only an empty list is replaced.
impl<T: Clone> Merge for Vec<T> {
    fn merge_from(&mut self, src: &Self, _path: &str) -> Result<(), BlockyardError> {
        if self.is_empty() && !src.is_empty() {
            self.clone_from(src);
        }
        Ok(())
    }
}

impl<T: Clone> Merge for Option<T> {
    fn merge_from(&mut self, src: &Self, _path: &str) -> Result<(), BlockyardError> {
        if self.is_none() {
            self.clone_from(src);
        }
        Ok(())
    }
}

impl Merge for Action {
    fn merge_from(&mut self, src: &Self, path: &str) -> Result<(), BlockyardError> {
        self.description.merge_from(&src.description, path)?;
        self.script.merge_from(&src.script, path)?;
        self.interactive.merge_from(&src.interactive, path)?;
        self.env.merge_from(&src.env, &join_path(path, "env"))?;
        self.mounts.merge_from(&src.mounts, path)?;
        self.block.merge_from(&src.block, path)?;
        Ok(())
    }
}

impl Merge for Block {
    fn merge_from(&mut self, src: &Self, path: &str) -> Result<(), BlockyardError> {
        self.name.merge_from(&src.name, path)?;
        let base = join_path(path, &self.name);

        self.description.merge_from(&src.description, &base)?;
        self.kind.merge_from(&src.kind, &base)?;
        self.version.merge_from(&src.version, &base)?;
        self.from.merge_from(&src.from, &base)?;
        self.checksum.merge_from(&src.checksum, &base)?;
        self.labels.merge_from(&src.labels, &join_path(&base, "labels"))?;
        self.alias.merge_from(&src.alias, &base)?;
        self.config.merge_from(&src.config, &join_path(&base, "config"))?;

        // Actions are matched by name rather than treated as one list value.
        for src_action in &src.actions {
            let action_path = join_path(&base, &format!("actions.{}", src_action.name));
            match self.action_mut(&src_action.name) {
                Some(dst_action) => dst_action.merge_from(src_action, &action_path)?,
                None => self.actions.push(src_action.clone()),
            }
        }

        if self.workdir.is_empty() {
            self.workdir.clone_from(&src.workdir);
        }
        self.schema.merge_from(&src.schema, &base)?;

        // `template` describes the declaring document only and is never inherited.
        Ok(())
    }
}
