//! The rename-variable operation.

use regex::Regex;

use crate::ast::Program;
use crate::ast::visit::rewrite_program;
use crate::error::{RefactorError, Result};
use crate::locate::ScopeFinder;
use crate::range::SelectionRange;
use crate::rewrite::ScopedVariableRenamer;

use super::Refactoring;

/// Rename a variable throughout the scope containing the given line.
///
/// The scope is the innermost function, method, closure, or arrow function
/// containing the line, or the global top level. No shadowing or collision
/// detection is performed; a rename onto an existing name silently merges.
#[derive(Debug, Clone)]
pub struct RenameVariable {
    selection: String,
    old_name: String,
    new_name: String,
}

impl RenameVariable {
    pub fn new(
        selection: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self {
            selection: selection.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    fn range(&self) -> Result<SelectionRange> {
        SelectionRange::parse(&self.selection).ok_or(RefactorError::InvalidRange)
    }

    fn normalized_names(&self) -> Result<(&str, &str)> {
        let old_name = normalize_identifier(&self.old_name)?;
        let new_name = normalize_identifier(&self.new_name)?;
        Ok((old_name, new_name))
    }
}

/// Strip an optional leading sigil and require a valid variable identifier.
fn normalize_identifier(raw: &str) -> Result<&str> {
    let name = raw.trim_start_matches('$');
    if name.is_empty() {
        return Err(RefactorError::EmptyVariableName);
    }
    let identifier = Regex::new(r"^[A-Za-z_\x80-\x{FF}][0-9A-Za-z_\x80-\x{FF}]*$").unwrap();
    if !identifier.is_match(name) {
        return Err(RefactorError::InvalidVariableName(name.to_string()));
    }
    Ok(name)
}

impl Refactoring for RenameVariable {
    fn name(&self) -> &'static str {
        "rename_variable"
    }

    fn validate(&self) -> Result<()> {
        self.range()?;
        self.normalized_names()?;
        Ok(())
    }

    fn apply(&self, program: Program) -> Result<(Program, String)> {
        let range = self.range()?;
        let (old_name, new_name) = self.normalized_names()?;

        let target = ScopeFinder::find(&program, range.start_line);
        let program = rewrite_program(
            program,
            &mut ScopedVariableRenamer::new(old_name, new_name, target),
        );

        let message = format!(
            "Successfully renamed variable '${old_name}' to '${new_name}' at {}",
            self.selection
        );
        Ok((program, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_accepts_normal_identifiers() {
        assert!(RenameVariable::new("3", "$count", "total").validate().is_ok());
        assert!(RenameVariable::new("3:4", "_tmp", "$x2").validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_high_byte_identifiers() {
        assert!(RenameVariable::new("3", "caf\u{e9}", "th\u{e9}").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_leading_digit() {
        let err = RenameVariable::new("3", "count", "123bad")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid variable name: 123bad");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_validate_rejects_punctuation() {
        assert!(RenameVariable::new("3", "a-b", "ok").validate().is_err());
        assert!(RenameVariable::new("3", "ok", "a b").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_after_sigil_strip() {
        let err = RenameVariable::new("3", "$", "ok").validate().unwrap_err();
        assert_eq!(err.to_string(), "Variable name cannot be empty");
    }

    #[test]
    fn test_validate_rejects_bad_line_spec() {
        let err = RenameVariable::new("line three", "a", "b")
            .validate()
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid selection range format"));
    }
}
