//! The extract-method operation.

use crate::ast::Program;
use crate::ast::visit::rewrite_program;
use crate::error::{RefactorError, Result};
use crate::flow::VariableFlowAnalyzer;
use crate::locate::StatementRangeFinder;
use crate::range::SelectionRange;
use crate::rewrite::{ExtractionPlan, MethodExtractor};

use super::Refactoring;

/// Extract the statements in a line range into a new private method on the
/// enclosing class.
#[derive(Debug, Clone)]
pub struct ExtractMethod {
    selection: String,
    method_name: String,
}

impl ExtractMethod {
    pub fn new(selection: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            method_name: method_name.into(),
        }
    }

    fn range(&self) -> Result<SelectionRange> {
        let range =
            SelectionRange::parse(&self.selection).ok_or(RefactorError::InvalidRange)?;
        if range.start_line > range.end_line {
            return Err(RefactorError::InvalidLineOrder {
                start: range.start_line,
                end: range.end_line,
            });
        }
        Ok(range)
    }

    fn normalized_name(&self) -> Result<&str> {
        let name = self.method_name.trim();
        if name.is_empty() {
            return Err(RefactorError::EmptyMethodName);
        }
        Ok(name)
    }
}

impl Refactoring for ExtractMethod {
    fn name(&self) -> &'static str {
        "extract_method"
    }

    fn validate(&self) -> Result<()> {
        self.range()?;
        self.normalized_name()?;
        Ok(())
    }

    fn apply(&self, program: Program) -> Result<(Program, String)> {
        let range = self.range()?;
        let method_name = self.normalized_name()?;
        let (start, end) = (range.start_line, range.end_line);

        let found = StatementRangeFinder::find(&program, start, end);
        if found.statements.is_empty() {
            return Err(RefactorError::NoStatementsInRange { start, end });
        }
        let class_id = found.class_id.ok_or(RefactorError::NotInClass)?;

        let flow = VariableFlowAnalyzer::new(
            &found.statements,
            found.callable.as_ref().map(|c| c.body.as_slice()),
            start,
            end,
        )
        .analyze();

        let plan = ExtractionPlan {
            statements: found.statements,
            callable_id: found.callable.map(|c| c.id),
            class_id,
            method_name: method_name.to_string(),
            parameters: flow.parameters,
            return_variables: flow.return_variables,
            start_line: start,
            end_line: end,
        };
        let program = rewrite_program(program, &mut MethodExtractor::new(plan));

        let message =
            format!("Successfully extracted method '{method_name}' from lines {start}-{end}");
        Ok((program, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_rejects_bad_range_before_anything_else() {
        let op = ExtractMethod::new("not-a-range", "helper");
        let err = op.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().starts_with("Invalid selection range format"));
    }

    #[test]
    fn test_validate_rejects_reversed_lines() {
        let op = ExtractMethod::new("5-3", "helper");
        let err = op.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Start line (5) must be less than or equal to end line (3)"
        );
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let op = ExtractMethod::new("3-4", "   ");
        let err = op.validate().unwrap_err();
        assert_eq!(err.to_string(), "Method name cannot be empty");
    }

    #[test]
    fn test_validate_accepts_all_range_grammars() {
        for selection in ["3", "3:1", "3-4", "3:1-4:9"] {
            assert!(ExtractMethod::new(selection, "helper").validate().is_ok());
        }
    }
}
