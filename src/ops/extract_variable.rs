//! The extract-variable operation (point selection).

use crate::ast::Program;
use crate::ast::visit::rewrite_program;
use crate::error::{RefactorError, Result};
use crate::locate::find_expression_at_line;
use crate::range::SelectionRange;
use crate::rewrite::ExpressionExtractor;

use super::Refactoring;

/// Extract the expression at a position into a named variable, assigned just
/// before the enclosing statement.
#[derive(Debug, Clone)]
pub struct ExtractVariable {
    selection: String,
    variable_name: String,
}

impl ExtractVariable {
    pub fn new(selection: impl Into<String>, variable_name: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            variable_name: variable_name.into(),
        }
    }

    fn range(&self) -> Result<SelectionRange> {
        SelectionRange::parse(&self.selection).ok_or(RefactorError::InvalidRange)
    }

    fn normalized_name(&self) -> Result<&str> {
        normalize_variable_name(&self.variable_name)
    }
}

/// Strip an optional leading sigil and reject empty names.
pub(super) fn normalize_variable_name(raw: &str) -> Result<&str> {
    let name = raw.trim_start_matches('$');
    if name.is_empty() {
        return Err(RefactorError::EmptyVariableName);
    }
    Ok(name)
}

impl Refactoring for ExtractVariable {
    fn name(&self) -> &'static str {
        "extract_variable"
    }

    fn validate(&self) -> Result<()> {
        self.range()?;
        self.normalized_name()?;
        Ok(())
    }

    fn apply(&self, program: Program) -> Result<(Program, String)> {
        let range = self.range()?;
        let variable_name = self.normalized_name()?;

        let found = find_expression_at_line(&program, range.start_line);
        let target = found.expression.ok_or(RefactorError::NoExpressionAt {
            line: range.start_line,
            column: range.start_column,
        })?;
        let anchor_id = found.anchor_id.ok_or(RefactorError::NoParentStatement)?;

        let program = rewrite_program(
            program,
            &mut ExpressionExtractor::new(target, anchor_id, variable_name),
        );

        let message = format!(
            "Successfully extracted variable '${variable_name}' at {}",
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
    fn test_validate_strips_sigil() {
        assert!(ExtractVariable::new("4:12", "$sum").validate().is_ok());
        assert!(ExtractVariable::new("4", "sum").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_sigil_only_name() {
        let err = ExtractVariable::new("4:12", "$").validate().unwrap_err();
        assert_eq!(err.to_string(), "Variable name cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_validate_rejects_bad_range() {
        let err = ExtractVariable::new("4:", "sum").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
