//! Variable flow analysis for method extraction.
//!
//! Purely syntactic and deliberately conservative: branches and loops are
//! not modeled, so a variable assigned only inside a conditional still
//! counts as assigned, and one only conditionally used afterward still
//! counts as used-after. The analysis may over-include but never
//! under-includes.

use crate::ast::visit::{Visitor, walk_stmt};
use crate::ast::{Expr, ExprKind, Param, RECEIVER_NAME, Stmt};

/// Parameters and return variables for an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableFlow {
    /// Variables the extracted block reads that were assigned earlier in the
    /// enclosing scope, in first-use order.
    pub parameters: Vec<String>,
    /// Variables the extracted block assigns that are read later in the
    /// enclosing scope, in first-assignment order.
    pub return_variables: Vec<String>,
}

/// Computes [`VariableFlow`] for a statement sequence about to be extracted.
pub struct VariableFlowAnalyzer<'a> {
    statements: &'a [Stmt],
    scope_body: Option<&'a [Stmt]>,
    start_line: u32,
    end_line: u32,
}

impl<'a> VariableFlowAnalyzer<'a> {
    /// `scope_body` is the direct statement list of the enclosing callable,
    /// if the extraction target sits inside one.
    pub fn new(
        statements: &'a [Stmt],
        scope_body: Option<&'a [Stmt]>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        Self {
            statements,
            scope_body,
            start_line,
            end_line,
        }
    }

    /// Run the analysis.
    pub fn analyze(&self) -> VariableFlow {
        let used = used_variables(self.statements);
        let defined_before = self.defined_before();
        let parameters = used
            .into_iter()
            .filter(|name| defined_before.contains(name))
            .collect();

        let assigned = assigned_variables(self.statements);
        let used_after = self.used_after();
        let return_variables = assigned
            .into_iter()
            .filter(|name| used_after.contains(name))
            .collect();

        VariableFlow {
            parameters,
            return_variables,
        }
    }

    /// Assignment targets in scope statements strictly before the range.
    ///
    /// The scan stops at the first statement starting at or after the range.
    fn defined_before(&self) -> Vec<String> {
        let Some(scope_body) = self.scope_body else {
            return Vec::new();
        };
        let mut collector = AssignedCollector::default();
        for stmt in scope_body {
            if stmt.span.start_line >= self.start_line {
                break;
            }
            walk_stmt(stmt, &mut collector);
        }
        collector.names
    }

    /// Variables referenced in scope statements strictly after the range.
    fn used_after(&self) -> Vec<String> {
        let Some(scope_body) = self.scope_body else {
            return Vec::new();
        };
        let mut collector = UsedCollector::default();
        for stmt in scope_body {
            if stmt.span.start_line <= self.end_line {
                continue;
            }
            walk_stmt(stmt, &mut collector);
        }
        collector.names
    }
}

/// Variable names referenced anywhere in the statements, first-seen order,
/// excluding the implicit receiver.
fn used_variables(statements: &[Stmt]) -> Vec<String> {
    let mut collector = UsedCollector::default();
    for stmt in statements {
        walk_stmt(stmt, &mut collector);
    }
    collector.names
}

/// Names on the direct left side of a simple assignment, first-seen order.
fn assigned_variables(statements: &[Stmt]) -> Vec<String> {
    let mut collector = AssignedCollector::default();
    for stmt in statements {
        walk_stmt(stmt, &mut collector);
    }
    collector.names
}

#[derive(Default)]
struct UsedCollector {
    names: Vec<String>,
}

impl UsedCollector {
    fn record(&mut self, name: &str) {
        if name != RECEIVER_NAME && !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }
}

impl Visitor for UsedCollector {
    fn enter_expr(&mut self, expr: &Expr) {
        if let ExprKind::Variable(name) = &expr.kind {
            self.record(name);
        }
    }

    fn visit_param(&mut self, param: &Param) {
        self.record(&param.name);
    }
}

#[derive(Default)]
struct AssignedCollector {
    names: Vec<String>,
}

impl Visitor for AssignedCollector {
    fn enter_expr(&mut self, expr: &Expr) {
        if let ExprKind::Assign { target, .. } = &expr.kind {
            if let ExprKind::Variable(name) = &target.kind {
                if !self.names.iter().any(|n| n == name) {
                    self.names.push(name.clone());
                }
            }
        }
    }
}
