//! Error type for the compile pipeline.

use knotweave_core::GraphError;
use knotweave_parse::ParseError;

/// Any failure of a compilation. There is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The script text could not be parsed.
    #[error("parsing error: {0}")]
    Parse(#[from] ParseError),

    /// The unit model is structurally broken.
    #[error("graph analysis error: {0}")]
    Graph(#[from] GraphError),

    /// JSON encoding or decoding of the artifact failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_stage_errors() {
        let err: CompileError = GraphError::MissingEntry("index".into()).into();
        assert_eq!(
            err.to_string(),
            "graph analysis error: script must contain a starting unit named 'index'"
        );

        let err: CompileError = ParseError::EmptyChoice { line: 3 }.into();
        assert!(matches!(err, CompileError::Parse(_)));
        assert!(err.to_string().starts_with("parsing error: line 3"));
    }
}
