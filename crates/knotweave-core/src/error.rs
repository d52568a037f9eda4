//! Error types for the story model and graph builder.

/// Malformed condition or mutation text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A `&&` with nothing on one side.
    #[error("empty clause in condition '{0}'")]
    EmptyClause(String),

    /// A comparison without `==` or `!=`.
    #[error("expected '==' or '!=' in '{0}'")]
    MissingOperator(String),

    /// A mutation without `=`.
    #[error("expected 'name = true|false' in '{0}'")]
    MissingAssignment(String),

    /// Nothing before the operator.
    #[error("missing variable name in '{0}'")]
    EmptyName(String),

    /// Right-hand side is not `true` or `false`.
    #[error("expected 'true' or 'false', found '{0}'")]
    BadLiteral(String),
}

/// Structural errors that abort a graph build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The entry unit is not part of the script.
    #[error("script must contain a starting unit named '{0}'")]
    MissingEntry(String),

    /// A choice leads to a unit that does not exist.
    #[error("choice '{choice}' in unit '{unit}' leads to non-existent unit '{target}'")]
    UnknownTarget {
        /// Unit owning the choice.
        unit: String,
        /// Label of the offending choice.
        choice: String,
        /// The unresolved destination.
        target: String,
    },
}

/// Result type for graph builds.
pub type Result<T> = std::result::Result<T, GraphError>;
