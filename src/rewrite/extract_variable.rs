//! Replaces an expression with a named variable, introducing the assignment
//! just before the anchor statement.
//!
//! One pass serves both extract-variable (point selection) and
//! introduce-variable (range selection): the locators differ, the rewrite is
//! identical.

use crate::ast::visit::{Rewriter, StmtEdit};
use crate::ast::{Expr, ExprKind, NodeId, Stmt, StmtKind};

/// Single-shot rewriter: substitutes the first traversal occurrence of the
/// target expression with a variable reference, then splices
/// `$name = <original expression>;` immediately before the anchor statement.
pub struct ExpressionExtractor {
    target: Expr,
    anchor_id: NodeId,
    variable_name: String,
    done: bool,
}

impl ExpressionExtractor {
    /// `target` is the located expression (its id identifies the node to
    /// replace); `anchor_id` is the statement the assignment goes before.
    pub fn new(target: Expr, anchor_id: NodeId, variable_name: impl Into<String>) -> Self {
        Self {
            target,
            anchor_id,
            variable_name: variable_name.into(),
            done: false,
        }
    }
}

impl Rewriter for ExpressionExtractor {
    fn rewrite_expr(&mut self, expr: Expr) -> Expr {
        if expr.id == self.target.id && !self.done {
            Expr::variable(self.variable_name.clone())
        } else {
            expr
        }
    }

    fn rewrite_stmt(&mut self, stmt: Stmt) -> StmtEdit {
        if stmt.id == self.anchor_id && !self.done {
            self.done = true;
            let assignment = Stmt::synthetic(StmtKind::Expr(Expr::synthetic(ExprKind::Assign {
                target: Box::new(Expr::variable(self.variable_name.clone())),
                value: Box::new(self.target.clone()),
            })));
            StmtEdit::Seq(vec![assignment, stmt])
        } else {
            StmtEdit::Stmt(stmt)
        }
    }
}
