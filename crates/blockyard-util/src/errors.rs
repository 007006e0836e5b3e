use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Blockyard operations.
#[derive(Debug, Error, Diagnostic)]
pub enum BlockyardError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A block document could not be read or parsed.
    #[error("Document error: {message}")]
    #[diagnostic(help("Check the block definition for syntax errors"))]
    Document { message: String },

    /// Invalid or unreadable workspace or user configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your workspace.toml"))]
    Config { message: String },

    /// A `from` reference names a block that is not in the workspace.
    #[error("Block '{block}' inherits from '{reference}', which does not exist in the workspace")]
    #[diagnostic(
        code(blockyard::unit_not_found),
        help("Check the 'from' field of block '{block}'")
    )]
    UnitNotFound { block: String, reference: String },

    /// The `from` references form a cycle, so resolution can never finish.
    #[error("Cyclic dependency detected; unresolved blocks: {}", .blocks.join(", "))]
    #[diagnostic(
        code(blockyard::cyclic_dependency),
        help("Break the cycle by removing one of the 'from' references")
    )]
    CyclicDependency { blocks: Vec<String> },

    /// One or more resolved blocks failed structural checks.
    #[error("Validation failed with {count} violation(s):\n{report}")]
    #[diagnostic(code(blockyard::validation))]
    Validation { count: usize, report: String },

    /// Two documents disagree on the shape of the same path.
    #[error("Cannot merge {src} into {dst} at '{path}'")]
    #[diagnostic(code(blockyard::merge_shape))]
    MergeShape {
        path: String,
        dst: &'static str,
        src: &'static str,
    },

    /// A block looked up by name does not exist.
    #[error("Block '{name}' not found in the workspace")]
    #[diagnostic(help("Run `blockyard blocks list` to see the available blocks"))]
    BlockNotFound { name: String },

    /// A block has no action with the requested name.
    #[error("Block '{block}' has no action named '{action}'")]
    #[diagnostic(help("Run `blockyard actions list {block}` to see its actions"))]
    ActionNotFound { block: String, action: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
