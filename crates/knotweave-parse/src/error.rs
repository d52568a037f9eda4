//! Error types for script parsing.

use knotweave_core::SyntaxError;

/// Errors found while scanning a script. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A `=== ===` header with nothing between the markers.
    #[error("line {line}: found unit with empty name")]
    EmptyUnitName { line: usize },

    /// A second unit header reusing an existing name.
    #[error("line {line}: unit '{name}' is declared more than once")]
    DuplicateUnit {
        line: usize,
        /// The repeated unit name.
        name: String,
    },

    /// A `{` without a closing `}` after it.
    #[error("line {line}: mismatched braces in condition")]
    MismatchedBraces { line: usize },

    /// A choice with no label, no target and no state changes.
    #[error("line {line}: choice appears to be empty")]
    EmptyChoice { line: usize },

    /// `->` followed by nothing.
    #[error("line {line}: '->' without a target")]
    EmptyTarget { line: usize },

    /// `-> .` with no tag after the dot.
    #[error("line {line}: anchor jump without a name")]
    EmptyAnchor { line: usize },

    /// The text between braces is not a valid condition.
    #[error("line {line}: invalid condition: {source}")]
    Condition {
        line: usize,
        /// What was wrong with the condition text.
        #[source]
        source: SyntaxError,
    },

    /// A `~` segment is not a valid `name = bool` assignment.
    #[error("line {line}: invalid state change: {source}")]
    Mutation {
        line: usize,
        /// What was wrong with the assignment text.
        #[source]
        source: SyntaxError,
    },
}

impl ParseError {
    /// Line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::EmptyUnitName { line }
            | ParseError::DuplicateUnit { line, .. }
            | ParseError::MismatchedBraces { line }
            | ParseError::EmptyChoice { line }
            | ParseError::EmptyTarget { line }
            | ParseError::EmptyAnchor { line }
            | ParseError::Condition { line, .. }
            | ParseError::Mutation { line, .. } => *line,
        }
    }
}

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
