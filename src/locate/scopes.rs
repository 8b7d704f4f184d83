//! Finds the innermost scope containing a line.

use crate::ast::visit::{Visitor, walk_program};
use crate::ast::{Expr, MethodDecl, NodeId, Param, Program, Stmt};

/// A rename boundary: a specific callable node, or top-level code.
///
/// "Global" is a valid outcome, not a failure: it means the line sits in
/// top-level code outside every callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTarget {
    Global,
    Scope(NodeId),
}

impl ScopeTarget {
    pub fn is_global(&self) -> bool {
        matches!(self, ScopeTarget::Global)
    }
}

/// Walks the tree keeping a stack of scope-introducing nodes (named
/// functions, methods, closures, arrow functions). Every visited node whose
/// span contains the target line promotes the current stack top to "best
/// scope"; deeper containment visits overwrite shallower ones, so the final
/// answer is the innermost qualifying scope.
pub struct ScopeFinder {
    target_line: u32,
    scope_stack: Vec<NodeId>,
    best: Option<NodeId>,
}

impl ScopeFinder {
    pub fn new(target_line: u32) -> Self {
        Self {
            target_line,
            scope_stack: Vec::new(),
            best: None,
        }
    }

    /// Run the finder over a program.
    pub fn find(program: &Program, target_line: u32) -> ScopeTarget {
        let mut finder = Self::new(target_line);
        walk_program(program, &mut finder);
        match finder.best {
            Some(id) => ScopeTarget::Scope(id),
            None => ScopeTarget::Global,
        }
    }

    fn observe(&mut self, start_line: u32, end_line: u32) {
        if start_line <= self.target_line && self.target_line <= end_line {
            if let Some(&top) = self.scope_stack.last() {
                self.best = Some(top);
            }
        }
    }
}

impl Visitor for ScopeFinder {
    fn enter_stmt(&mut self, stmt: &Stmt) {
        if stmt.is_scope_introducing() {
            self.scope_stack.push(stmt.id);
        }
        self.observe(stmt.span.start_line, stmt.span.end_line);
    }

    fn leave_stmt(&mut self, stmt: &Stmt) {
        if stmt.is_scope_introducing() && self.scope_stack.last() == Some(&stmt.id) {
            self.scope_stack.pop();
        }
    }

    fn enter_expr(&mut self, expr: &Expr) {
        if expr.is_scope_introducing() {
            self.scope_stack.push(expr.id);
        }
        self.observe(expr.span.start_line, expr.span.end_line);
    }

    fn leave_expr(&mut self, expr: &Expr) {
        if expr.is_scope_introducing() && self.scope_stack.last() == Some(&expr.id) {
            self.scope_stack.pop();
        }
    }

    fn enter_method(&mut self, method: &MethodDecl) {
        self.scope_stack.push(method.id);
        self.observe(method.span.start_line, method.span.end_line);
    }

    fn leave_method(&mut self, method: &MethodDecl) {
        if self.scope_stack.last() == Some(&method.id) {
            self.scope_stack.pop();
        }
    }

    fn visit_param(&mut self, param: &Param) {
        self.observe(param.span.start_line, param.span.end_line);
    }
}
