//! Finds the best-matching expression at a position or within a range.
//!
//! Matching is line-granular: column data from the selection is accepted but
//! not used to narrow candidates. This is a known precision limit of the
//! contract, kept deliberately rather than silently tightened.
//!
//! Bare variable references and assignments are never candidates — extracting
//! either is degenerate.

use crate::ast::visit::{Visitor, walk_program};
use crate::ast::{Expr, ExprKind, NodeId, Program, Stmt};

/// A located expression plus the statement to splice an assignment before.
#[derive(Debug, Clone)]
pub struct ExpressionMatch {
    /// The best-matching expression (deep clone; its id identifies the
    /// original node).
    pub expression: Option<Expr>,
    /// Innermost statement enclosing the match at the moment it was
    /// selected.
    pub anchor_id: Option<NodeId>,
}

/// Find the outermost candidate expression starting on `line`.
///
/// Among candidates on the same line, one that strictly encloses the current
/// best (by byte offsets) replaces it; the traversal visits outer nodes
/// first, so the first-seen outermost candidate naturally wins.
pub fn find_expression_at_line(program: &Program, line: u32) -> ExpressionMatch {
    let mut finder = ExpressionFinder {
        criteria: Criteria::Point { line },
        stmt_stack: Vec::new(),
        best: None,
        anchor: None,
    };
    walk_program(program, &mut finder);
    ExpressionMatch {
        expression: finder.best,
        anchor_id: finder.anchor,
    }
}

/// Find the most encompassing candidate expression overlapping
/// `[start_line, end_line]`.
///
/// Among overlapping candidates, a strictly longer byte span replaces the
/// current best.
pub fn find_expression_in_range(program: &Program, start_line: u32, end_line: u32) -> ExpressionMatch {
    let mut finder = ExpressionFinder {
        criteria: Criteria::Range {
            start_line,
            end_line,
        },
        stmt_stack: Vec::new(),
        best: None,
        anchor: None,
    };
    walk_program(program, &mut finder);
    ExpressionMatch {
        expression: finder.best,
        anchor_id: finder.anchor,
    }
}

enum Criteria {
    Point { line: u32 },
    Range { start_line: u32, end_line: u32 },
}

struct ExpressionFinder {
    criteria: Criteria,
    stmt_stack: Vec<NodeId>,
    best: Option<Expr>,
    anchor: Option<NodeId>,
}

impl ExpressionFinder {
    fn is_candidate(&self, expr: &Expr) -> bool {
        if matches!(expr.kind, ExprKind::Variable(_) | ExprKind::Assign { .. }) {
            return false;
        }
        match self.criteria {
            Criteria::Point { line } => expr.span.start_line == line,
            Criteria::Range {
                start_line,
                end_line,
            } => expr.span.overlaps_lines(start_line, end_line),
        }
    }

    fn is_better(&self, expr: &Expr, best: &Expr) -> bool {
        match self.criteria {
            Criteria::Point { .. } => expr.span.encloses(&best.span),
            Criteria::Range { .. } => expr.span.len() > best.span.len(),
        }
    }

    fn select(&mut self, expr: &Expr) {
        self.best = Some(expr.clone());
        self.anchor = self.stmt_stack.last().copied();
    }
}

impl Visitor for ExpressionFinder {
    fn enter_stmt(&mut self, stmt: &Stmt) {
        self.stmt_stack.push(stmt.id);
    }

    fn leave_stmt(&mut self, stmt: &Stmt) {
        if self.stmt_stack.last() == Some(&stmt.id) {
            self.stmt_stack.pop();
        }
    }

    fn enter_expr(&mut self, expr: &Expr) {
        if !self.is_candidate(expr) {
            return;
        }
        let better = match &self.best {
            None => true,
            Some(best) => self.is_better(expr, best),
        };
        if better {
            self.select(expr);
        }
    }
}
