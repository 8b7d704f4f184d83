//! Tree traversal: a read-only visitor walk and a mutating rewrite.
//!
//! Both traversals are depth-first in document order and share one contract:
//! `enter_*` fires before a node's children, the leave-side hook fires after
//! them. Finders maintain ancestry stacks across these hooks instead of the
//! tree holding parent pointers; a stack is popped only when the node being
//! left is the one on top.
//!
//! The mutating side rebuilds the tree bottom-up. A [`Rewriter`] returns an
//! explicit instruction for each statement — keep/replace it, or splice a
//! sequence in its place — rather than mutating shared state from inside the
//! walk. Spliced statements are emitted as-is and not re-traversed.

use super::{ClassDecl, Expr, ExprKind, FunctionDecl, MethodDecl, Param, Program, Stmt, StmtKind};

/// Read-only traversal hooks. All methods default to doing nothing.
pub trait Visitor {
    fn enter_stmt(&mut self, _stmt: &Stmt) {}
    fn leave_stmt(&mut self, _stmt: &Stmt) {}
    fn enter_expr(&mut self, _expr: &Expr) {}
    fn leave_expr(&mut self, _expr: &Expr) {}
    fn enter_method(&mut self, _method: &MethodDecl) {}
    fn leave_method(&mut self, _method: &MethodDecl) {}
    fn visit_param(&mut self, _param: &Param) {}
}

/// Walk a whole program.
pub fn walk_program<V: Visitor>(program: &Program, visitor: &mut V) {
    for stmt in &program.stmts {
        walk_stmt(stmt, visitor);
    }
}

/// Walk a single statement and its children.
pub fn walk_stmt<V: Visitor>(stmt: &Stmt, visitor: &mut V) {
    visitor.enter_stmt(stmt);
    match &stmt.kind {
        StmtKind::Expr(expr) => walk_expr(expr, visitor),
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                walk_expr(expr, visitor);
            }
        }
        StmtKind::Echo(args) => {
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            walk_expr(cond, visitor);
            for stmt in then_body {
                walk_stmt(stmt, visitor);
            }
            if let Some(else_body) = else_body {
                for stmt in else_body {
                    walk_stmt(stmt, visitor);
                }
            }
        }
        StmtKind::While { cond, body } => {
            walk_expr(cond, visitor);
            for stmt in body {
                walk_stmt(stmt, visitor);
            }
        }
        StmtKind::Function(func) => {
            for param in &func.params {
                visitor.visit_param(param);
            }
            for stmt in &func.body {
                walk_stmt(stmt, visitor);
            }
        }
        StmtKind::Class(class) => {
            for method in &class.methods {
                walk_method(method, visitor);
            }
        }
    }
    visitor.leave_stmt(stmt);
}

/// Walk a method declaration and its body.
pub fn walk_method<V: Visitor>(method: &MethodDecl, visitor: &mut V) {
    visitor.enter_method(method);
    for param in &method.params {
        visitor.visit_param(param);
    }
    for stmt in &method.body {
        walk_stmt(stmt, visitor);
    }
    visitor.leave_method(method);
}

/// Walk an expression and its children.
pub fn walk_expr<V: Visitor>(expr: &Expr, visitor: &mut V) {
    visitor.enter_expr(expr);
    match &expr.kind {
        ExprKind::Variable(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null => {}
        ExprKind::Assign { target, value } => {
            walk_expr(target, visitor);
            walk_expr(value, visitor);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, visitor);
            walk_expr(rhs, visitor);
        }
        ExprKind::Unary { operand, .. } => walk_expr(operand, visitor),
        ExprKind::Array(items) | ExprKind::List(items) => {
            for item in items {
                walk_expr(item, visitor);
            }
        }
        ExprKind::Call { args, .. } => {
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::MethodCall { receiver, args, .. } => {
            walk_expr(receiver, visitor);
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::PropertyFetch { receiver, .. } => walk_expr(receiver, visitor),
        ExprKind::Closure { params, uses, body } => {
            for param in params {
                visitor.visit_param(param);
            }
            for capture in uses {
                visitor.visit_param(capture);
            }
            for stmt in body {
                walk_stmt(stmt, visitor);
            }
        }
        ExprKind::ArrowFn { params, body } => {
            for param in params {
                visitor.visit_param(param);
            }
            walk_expr(body, visitor);
        }
    }
    visitor.leave_expr(expr);
}

/// Instruction returned by [`Rewriter::rewrite_stmt`] for each statement.
#[derive(Debug)]
pub enum StmtEdit {
    /// Keep the (possibly modified) statement.
    Stmt(Stmt),
    /// Replace the statement with this sequence, spliced into the enclosing
    /// statement list.
    Seq(Vec<Stmt>),
}

/// Mutating traversal hooks, applied post-order: children are rebuilt before
/// the node's own `rewrite_*` hook runs. Defaults keep every node unchanged.
pub trait Rewriter {
    fn enter_stmt(&mut self, _stmt: &Stmt) {}
    fn enter_expr(&mut self, _expr: &Expr) {}
    fn enter_method(&mut self, _method: &MethodDecl) {}

    fn rewrite_stmt(&mut self, stmt: Stmt) -> StmtEdit {
        StmtEdit::Stmt(stmt)
    }

    fn rewrite_expr(&mut self, expr: Expr) -> Expr {
        expr
    }

    fn rewrite_method(&mut self, method: MethodDecl) -> MethodDecl {
        method
    }

    fn rewrite_param(&mut self, param: Param) -> Param {
        param
    }
}

/// Rebuild a whole program through a rewriter.
pub fn rewrite_program<R: Rewriter>(program: Program, rewriter: &mut R) -> Program {
    Program {
        stmts: rewrite_stmts(program.stmts, rewriter),
    }
}

/// Rebuild a statement list, flattening any spliced sequences.
pub fn rewrite_stmts<R: Rewriter>(stmts: Vec<Stmt>, rewriter: &mut R) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        match rewrite_stmt_node(stmt, rewriter) {
            StmtEdit::Stmt(stmt) => out.push(stmt),
            StmtEdit::Seq(seq) => out.extend(seq),
        }
    }
    out
}

fn rewrite_stmt_node<R: Rewriter>(mut stmt: Stmt, rewriter: &mut R) -> StmtEdit {
    rewriter.enter_stmt(&stmt);
    stmt.kind = match stmt.kind {
        StmtKind::Expr(expr) => StmtKind::Expr(rewrite_expr_node(expr, rewriter)),
        StmtKind::Return(expr) => StmtKind::Return(expr.map(|e| rewrite_expr_node(e, rewriter))),
        StmtKind::Echo(args) => StmtKind::Echo(
            args.into_iter()
                .map(|a| rewrite_expr_node(a, rewriter))
                .collect(),
        ),
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => StmtKind::If {
            cond: rewrite_expr_node(cond, rewriter),
            then_body: rewrite_stmts(then_body, rewriter),
            else_body: else_body.map(|body| rewrite_stmts(body, rewriter)),
        },
        StmtKind::While { cond, body } => StmtKind::While {
            cond: rewrite_expr_node(cond, rewriter),
            body: rewrite_stmts(body, rewriter),
        },
        StmtKind::Function(func) => StmtKind::Function(FunctionDecl {
            name: func.name,
            params: func
                .params
                .into_iter()
                .map(|p| rewriter.rewrite_param(p))
                .collect(),
            body: rewrite_stmts(func.body, rewriter),
        }),
        StmtKind::Class(class) => StmtKind::Class(ClassDecl {
            name: class.name,
            methods: class
                .methods
                .into_iter()
                .map(|m| rewrite_method_node(m, rewriter))
                .collect(),
        }),
    };
    rewriter.rewrite_stmt(stmt)
}

fn rewrite_method_node<R: Rewriter>(mut method: MethodDecl, rewriter: &mut R) -> MethodDecl {
    rewriter.enter_method(&method);
    method.params = method
        .params
        .into_iter()
        .map(|p| rewriter.rewrite_param(p))
        .collect();
    method.body = rewrite_stmts(method.body, rewriter);
    rewriter.rewrite_method(method)
}

fn rewrite_expr_node<R: Rewriter>(mut expr: Expr, rewriter: &mut R) -> Expr {
    rewriter.enter_expr(&expr);
    expr.kind = match expr.kind {
        kind @ (ExprKind::Variable(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null) => kind,
        ExprKind::Assign { target, value } => ExprKind::Assign {
            target: Box::new(rewrite_expr_node(*target, rewriter)),
            value: Box::new(rewrite_expr_node(*value, rewriter)),
        },
        ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: Box::new(rewrite_expr_node(*lhs, rewriter)),
            rhs: Box::new(rewrite_expr_node(*rhs, rewriter)),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary {
            op,
            operand: Box::new(rewrite_expr_node(*operand, rewriter)),
        },
        ExprKind::Array(items) => ExprKind::Array(
            items
                .into_iter()
                .map(|i| rewrite_expr_node(i, rewriter))
                .collect(),
        ),
        ExprKind::List(items) => ExprKind::List(
            items
                .into_iter()
                .map(|i| rewrite_expr_node(i, rewriter))
                .collect(),
        ),
        ExprKind::Call { name, args } => ExprKind::Call {
            name,
            args: args
                .into_iter()
                .map(|a| rewrite_expr_node(a, rewriter))
                .collect(),
        },
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => ExprKind::MethodCall {
            receiver: Box::new(rewrite_expr_node(*receiver, rewriter)),
            method,
            args: args
                .into_iter()
                .map(|a| rewrite_expr_node(a, rewriter))
                .collect(),
        },
        ExprKind::PropertyFetch { receiver, property } => ExprKind::PropertyFetch {
            receiver: Box::new(rewrite_expr_node(*receiver, rewriter)),
            property,
        },
        ExprKind::Closure { params, uses, body } => ExprKind::Closure {
            params: params
                .into_iter()
                .map(|p| rewriter.rewrite_param(p))
                .collect(),
            uses: uses
                .into_iter()
                .map(|p| rewriter.rewrite_param(p))
                .collect(),
            body: rewrite_stmts(body, rewriter),
        },
        ExprKind::ArrowFn { params, body } => ExprKind::ArrowFn {
            params: params
                .into_iter()
                .map(|p| rewriter.rewrite_param(p))
                .collect(),
            body: Box::new(rewrite_expr_node(*body, rewriter)),
        },
    };
    rewriter.rewrite_expr(expr)
}
