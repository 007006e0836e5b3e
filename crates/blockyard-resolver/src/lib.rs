//! Inheritance resolution: folds every block's `from` chain into it, detects
//! cycles and missing parents, and validates the resolved registry.

pub mod graph;
pub mod resolver;
pub mod validate;
