//! Core data types for Blockyard.
//!
//! This crate defines the fundamental types that describe a workspace of
//! blocks: the schema-less configuration [`value::Value`], blocks and their
//! actions, the existing-wins merge engine, the block registry, block
//! documents and workspace configuration.
//!
//! This crate is intentionally free of process spawning and network I/O.

pub mod block;
pub mod config;
pub mod document;
pub mod merge;
pub mod registry;
pub mod value;
