//! The introduce-variable operation (range selection).

use crate::ast::Program;
use crate::ast::visit::rewrite_program;
use crate::error::{RefactorError, Result};
use crate::locate::find_expression_in_range;
use crate::range::SelectionRange;
use crate::rewrite::ExpressionExtractor;

use super::Refactoring;
use super::extract_variable::normalize_variable_name;

/// Introduce a named variable for the most encompassing expression inside a
/// selection range.
///
/// Differs from [`ExtractVariable`](super::ExtractVariable) only in how the
/// target expression is located; the rewrite is shared.
#[derive(Debug, Clone)]
pub struct IntroduceVariable {
    selection: String,
    variable_name: String,
}

impl IntroduceVariable {
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

impl Refactoring for IntroduceVariable {
    fn name(&self) -> &'static str {
        "introduce_variable"
    }

    fn validate(&self) -> Result<()> {
        self.range()?;
        self.normalized_name()?;
        Ok(())
    }

    fn apply(&self, program: Program) -> Result<(Program, String)> {
        let range = self.range()?;
        let variable_name = self.normalized_name()?;
        let (start, end) = (range.start_line, range.end_line);

        let found = find_expression_in_range(&program, start, end);
        let target = found
            .expression
            .ok_or(RefactorError::NoExpressionInRange { start, end })?;
        let anchor_id = found.anchor_id.ok_or(RefactorError::NoParentStatement)?;

        let program = rewrite_program(
            program,
            &mut ExpressionExtractor::new(target, anchor_id, variable_name),
        );

        let message = format!(
            "Successfully introduced variable '${variable_name}' at {}",
            self.selection
        );
        Ok((program, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_point_and_range_grammars() {
        for selection in ["4", "4:3", "4-6", "4:3-4:8"] {
            assert!(
                IntroduceVariable::new(selection, "sum").validate().is_ok(),
                "selection {selection:?} should validate"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(IntroduceVariable::new("4", "").validate().is_err());
    }
}
