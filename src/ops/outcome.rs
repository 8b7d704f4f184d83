//! The uniform result shape every operation returns.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RefactorError;

/// Result of a refactoring operation.
///
/// Exactly one of `code` and `error` is present: a successful outcome
/// carries the fully rewritten source, a failed one carries the converted
/// error message. Serializes to the wire shape embedding hosts expect.
#[derive(Debug, Clone, Serialize)]
pub struct RefactoringOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefactoringOutcome {
    /// Build a successful outcome.
    pub fn success(file: &Path, code: String, message: String) -> Self {
        Self {
            success: true,
            code: Some(code),
            file: Some(file.to_path_buf()),
            message: Some(message),
            error: None,
        }
    }

    /// Build a failed outcome from a converted error.
    pub fn failure(error: RefactorError) -> Self {
        Self {
            success: false,
            code: None,
            file: None,
            message: None,
            error: Some(error.to_string()),
        }
    }
}
