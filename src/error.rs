//! Error types for the refactoring engine.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for refactoring operations.
///
/// Every internal failure is converted to one of these variants before it
/// crosses an operation boundary; the `Display` string is the user-facing
/// message carried by [`crate::ops::RefactoringOutcome`].
#[derive(Error, Debug)]
pub enum RefactorError {
    #[error(
        "Invalid selection range format. Use 'startLine:startColumn-endLine:endColumn', 'startLine-endLine', 'line:column', or 'line'"
    )]
    InvalidRange,

    #[error("Start line ({start}) must be less than or equal to end line ({end})")]
    InvalidLineOrder { start: u32, end: u32 },

    #[error("Method name cannot be empty")]
    EmptyMethodName,

    #[error("Variable name cannot be empty")]
    EmptyVariableName,

    #[error("Invalid variable name: {0}")]
    InvalidVariableName(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Could not find statements between lines {start} and {end}")]
    NoStatementsInRange { start: u32, end: u32 },

    #[error("Can only extract methods within a class")]
    NotInClass,

    #[error("Could not find expression at line {line}, column {column}")]
    NoExpressionAt { line: u32, column: u32 },

    #[error("Could not find expression between lines {start} and {end}")]
    NoExpressionInRange { start: u32, end: u32 },

    #[error("Could not find parent statement for expression")]
    NoParentStatement,

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Unexpected error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of [`RefactorError`] variants.
///
/// Input errors are raised before any file access; not-found errors carry
/// location context; parse errors come from the language front end; anything
/// else is unexpected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    NotFound,
    Parse,
    Unexpected,
}

impl RefactorError {
    /// Classify this error into the operation-boundary taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefactorError::InvalidRange
            | RefactorError::InvalidLineOrder { .. }
            | RefactorError::EmptyMethodName
            | RefactorError::EmptyVariableName
            | RefactorError::InvalidVariableName(_) => ErrorKind::Input,
            RefactorError::FileNotFound(_)
            | RefactorError::NoStatementsInRange { .. }
            | RefactorError::NotInClass
            | RefactorError::NoExpressionAt { .. }
            | RefactorError::NoExpressionInRange { .. }
            | RefactorError::NoParentStatement => ErrorKind::NotFound,
            RefactorError::Parse { .. } => ErrorKind::Parse,
            RefactorError::Io(_) | RefactorError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// A specialized Result type for refactoring operations.
pub type Result<T> = std::result::Result<T, RefactorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RefactorError::InvalidRange.kind(), ErrorKind::Input);
        assert_eq!(RefactorError::NotInClass.kind(), ErrorKind::NotFound);
        assert_eq!(
            RefactorError::Parse {
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            RefactorError::Unexpected("store offline".into()).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn test_messages_are_user_facing() {
        let err = RefactorError::InvalidLineOrder { start: 5, end: 3 };
        assert_eq!(
            err.to_string(),
            "Start line (5) must be less than or equal to end line (3)"
        );

        let err = RefactorError::NoStatementsInRange { start: 2, end: 4 };
        assert_eq!(
            err.to_string(),
            "Could not find statements between lines 2 and 4"
        );

        let err = RefactorError::Parse {
            message: "unexpected token".into(),
        };
        assert_eq!(err.to_string(), "Parse error: unexpected token");
    }
}
