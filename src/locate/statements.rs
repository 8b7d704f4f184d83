//! Finds the statements fully inside a line range, with their enclosing
//! callable and class.

use crate::ast::visit::{Visitor, walk_program};
use crate::ast::{MethodDecl, NodeId, Program, Stmt, StmtKind};

/// The callable (method or named function) enclosing a statement match.
///
/// Carries a clone of the callable's direct statement list: the flow
/// analyzer scans it for assignments before and uses after the range.
#[derive(Debug, Clone)]
pub struct EnclosingCallable {
    pub id: NodeId,
    pub body: Vec<Stmt>,
}

/// Result of a statement-range search.
#[derive(Debug, Clone)]
pub struct StatementMatch {
    /// Matched statements in document order (deep clones).
    pub statements: Vec<Stmt>,
    /// Callable enclosing the first match, if any.
    pub callable: Option<EnclosingCallable>,
    /// Class enclosing the first match, if any.
    pub class_id: Option<NodeId>,
}

/// Collects statements whose spans lie fully inside `[start_line, end_line]`.
///
/// Partial overlap never matches. Class declarations are containers, not
/// candidates; everything else — including container statements like `if`,
/// whose inner statements are then also visited and collected — is eligible.
/// The enclosing callable and class are snapshotted from the stacks when
/// they are first available.
pub struct StatementRangeFinder {
    start_line: u32,
    end_line: u32,
    statements: Vec<Stmt>,
    callable: Option<EnclosingCallable>,
    class_id: Option<NodeId>,
    callable_stack: Vec<EnclosingCallable>,
    class_stack: Vec<NodeId>,
}

impl StatementRangeFinder {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
            statements: Vec::new(),
            callable: None,
            class_id: None,
            callable_stack: Vec::new(),
            class_stack: Vec::new(),
        }
    }

    /// Run the finder over a program.
    pub fn find(program: &Program, start_line: u32, end_line: u32) -> StatementMatch {
        let mut finder = Self::new(start_line, end_line);
        walk_program(program, &mut finder);
        StatementMatch {
            statements: finder.statements,
            callable: finder.callable,
            class_id: finder.class_id,
        }
    }

    fn record_match(&mut self, stmt: &Stmt) {
        self.statements.push(stmt.clone());
        if self.callable.is_none() {
            self.callable = self.callable_stack.last().cloned();
        }
        if self.class_id.is_none() {
            self.class_id = self.class_stack.last().copied();
        }
    }
}

impl Visitor for StatementRangeFinder {
    fn enter_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Class(_) => {
                self.class_stack.push(stmt.id);
            }
            StmtKind::Function(func) => {
                self.callable_stack.push(EnclosingCallable {
                    id: stmt.id,
                    body: func.body.clone(),
                });
            }
            _ => {}
        }

        if !matches!(stmt.kind, StmtKind::Class(_))
            && stmt.span.within_lines(self.start_line, self.end_line)
        {
            self.record_match(stmt);
        }
    }

    fn leave_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Class(_) => {
                if self.class_stack.last() == Some(&stmt.id) {
                    self.class_stack.pop();
                }
            }
            StmtKind::Function(_) => {
                if self.callable_stack.last().map(|c| c.id) == Some(stmt.id) {
                    self.callable_stack.pop();
                }
            }
            _ => {}
        }
    }

    fn enter_method(&mut self, method: &MethodDecl) {
        self.callable_stack.push(EnclosingCallable {
            id: method.id,
            body: method.body.clone(),
        });
    }

    fn leave_method(&mut self, method: &MethodDecl) {
        if self.callable_stack.last().map(|c| c.id) == Some(method.id) {
            self.callable_stack.pop();
        }
    }
}
