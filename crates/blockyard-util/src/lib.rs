//! Shared utilities for Blockyard.
//!
//! This crate provides cross-cutting concerns used by all other Blockyard
//! crates: the unified error taxonomy, filesystem helpers and terminal
//! status lines.

pub mod errors;
pub mod fs;
pub mod progress;
