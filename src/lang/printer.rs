//! Canonical printer for the PHP subset.
//!
//! Deterministic and total for any tree the engine produces: 4-space
//! indentation, one statement per line, spaces around binary operators,
//! single-quoted strings. Printing then reparsing yields a structurally
//! equivalent tree; original formatting is not preserved.

use std::fmt::Write;

use crate::ast::{Expr, ExprKind, MethodDecl, Param, Program, Stmt, StmtKind};

use super::Printer;

/// The built-in printer implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpPrinter;

impl PhpPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for PhpPrinter {
    fn print(&self, program: &Program) -> String {
        let mut out = String::from("<?php\n\n");
        for stmt in &program.stmts {
            print_stmt(stmt, 0, &mut out);
        }
        out
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn print_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    match &stmt.kind {
        StmtKind::Expr(expr) => {
            push_indent(out, depth);
            print_expr(expr, depth, out);
            out.push_str(";\n");
        }
        StmtKind::Return(None) => {
            push_indent(out, depth);
            out.push_str("return;\n");
        }
        StmtKind::Return(Some(expr)) => {
            push_indent(out, depth);
            out.push_str("return ");
            print_expr(expr, depth, out);
            out.push_str(";\n");
        }
        StmtKind::Echo(args) => {
            push_indent(out, depth);
            out.push_str("echo ");
            print_list(args, depth, out);
            out.push_str(";\n");
        }
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            push_indent(out, depth);
            out.push_str("if (");
            print_expr(cond, depth, out);
            out.push_str(") {\n");
            for stmt in then_body {
                print_stmt(stmt, depth + 1, out);
            }
            push_indent(out, depth);
            out.push('}');
            if let Some(else_body) = else_body {
                out.push_str(" else {\n");
                for stmt in else_body {
                    print_stmt(stmt, depth + 1, out);
                }
                push_indent(out, depth);
                out.push('}');
            }
            out.push('\n');
        }
        StmtKind::While { cond, body } => {
            push_indent(out, depth);
            out.push_str("while (");
            print_expr(cond, depth, out);
            out.push_str(") {\n");
            for stmt in body {
                print_stmt(stmt, depth + 1, out);
            }
            push_indent(out, depth);
            out.push_str("}\n");
        }
        StmtKind::Function(func) => {
            push_indent(out, depth);
            out.push_str("function ");
            out.push_str(&func.name);
            out.push('(');
            print_params(&func.params, out);
            out.push_str(")\n");
            push_indent(out, depth);
            out.push_str("{\n");
            for stmt in &func.body {
                print_stmt(stmt, depth + 1, out);
            }
            push_indent(out, depth);
            out.push_str("}\n");
        }
        StmtKind::Class(class) => {
            push_indent(out, depth);
            out.push_str("class ");
            out.push_str(&class.name);
            out.push('\n');
            push_indent(out, depth);
            out.push_str("{\n");
            for method in &class.methods {
                print_method(method, depth + 1, out);
            }
            push_indent(out, depth);
            out.push_str("}\n");
        }
    }
}

fn print_method(method: &MethodDecl, depth: usize, out: &mut String) {
    push_indent(out, depth);
    out.push_str(method.visibility.keyword());
    out.push_str(" function ");
    out.push_str(&method.name);
    out.push('(');
    print_params(&method.params, out);
    out.push_str(")\n");
    push_indent(out, depth);
    out.push_str("{\n");
    for stmt in &method.body {
        print_stmt(stmt, depth + 1, out);
    }
    push_indent(out, depth);
    out.push_str("}\n");
}

fn print_params(params: &[Param], out: &mut String) {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('$');
        out.push_str(&param.name);
    }
}

fn print_list(items: &[Expr], depth: usize, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        print_expr(item, depth, out);
    }
}

fn print_expr(expr: &Expr, depth: usize, out: &mut String) {
    match &expr.kind {
        ExprKind::Variable(name) => {
            out.push('$');
            out.push_str(name);
        }
        ExprKind::Assign { target, value } => {
            print_expr(target, depth, out);
            out.push_str(" = ");
            print_expr(value, depth, out);
        }
        ExprKind::Binary { op, lhs, rhs } => {
            print_operand(lhs, op.precedence(), false, depth, out);
            write!(out, " {} ", op.symbol()).unwrap();
            print_operand(rhs, op.precedence(), true, depth, out);
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(op.symbol());
            let needs_parens = matches!(
                operand.kind,
                ExprKind::Binary { .. } | ExprKind::Assign { .. }
            );
            if needs_parens {
                out.push('(');
                print_expr(operand, depth, out);
                out.push(')');
            } else {
                print_expr(operand, depth, out);
            }
        }
        ExprKind::Int(value) => {
            write!(out, "{value}").unwrap();
        }
        ExprKind::Float(value) => {
            if value.fract() == 0.0 && value.is_finite() {
                write!(out, "{value:.1}").unwrap();
            } else {
                write!(out, "{value}").unwrap();
            }
        }
        ExprKind::Str(value) => {
            out.push('\'');
            for ch in value.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    _ => out.push(ch),
                }
            }
            out.push('\'');
        }
        ExprKind::Bool(true) => out.push_str("true"),
        ExprKind::Bool(false) => out.push_str("false"),
        ExprKind::Null => out.push_str("null"),
        ExprKind::Array(items) => {
            out.push('[');
            print_list(items, depth, out);
            out.push(']');
        }
        ExprKind::List(items) => {
            out.push_str("list(");
            print_list(items, depth, out);
            out.push(')');
        }
        ExprKind::Call { name, args } => {
            out.push_str(name);
            out.push('(');
            print_list(args, depth, out);
            out.push(')');
        }
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => {
            print_receiver(receiver, depth, out);
            out.push_str("->");
            out.push_str(method);
            out.push('(');
            print_list(args, depth, out);
            out.push(')');
        }
        ExprKind::PropertyFetch { receiver, property } => {
            print_receiver(receiver, depth, out);
            out.push_str("->");
            out.push_str(property);
        }
        ExprKind::Closure { params, uses, body } => {
            out.push_str("function (");
            print_params(params, out);
            out.push(')');
            if !uses.is_empty() {
                out.push_str(" use (");
                print_params(uses, out);
                out.push(')');
            }
            out.push_str(" {\n");
            for stmt in body {
                print_stmt(stmt, depth + 1, out);
            }
            push_indent(out, depth);
            out.push('}');
        }
        ExprKind::ArrowFn { params, body } => {
            out.push_str("fn (");
            print_params(params, out);
            out.push_str(") => ");
            print_expr(body, depth, out);
        }
    }
}

/// Print a binary operand, parenthesizing when reparsing would otherwise
/// regroup it.
fn print_operand(operand: &Expr, parent_prec: u8, is_right: bool, depth: usize, out: &mut String) {
    let needs_parens = match &operand.kind {
        ExprKind::Assign { .. } => true,
        ExprKind::Binary { op, .. } => {
            let prec = op.precedence();
            prec < parent_prec || (is_right && prec == parent_prec)
        }
        _ => false,
    };
    if needs_parens {
        out.push('(');
        print_expr(operand, depth, out);
        out.push(')');
    } else {
        print_expr(operand, depth, out);
    }
}

/// Receivers that are not simple chains need wrapping before `->`.
fn print_receiver(receiver: &Expr, depth: usize, out: &mut String) {
    let simple = matches!(
        receiver.kind,
        ExprKind::Variable(_)
            | ExprKind::Call { .. }
            | ExprKind::MethodCall { .. }
            | ExprKind::PropertyFetch { .. }
    );
    if simple {
        print_expr(receiver, depth, out);
    } else {
        out.push('(');
        print_expr(receiver, depth, out);
        out.push(')');
    }
}
