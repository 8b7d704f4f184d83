//! Renames variable references within a scope.

use crate::ast::visit::{Rewriter, StmtEdit};
use crate::ast::{Expr, ExprKind, MethodDecl, Param, Stmt};
use crate::locate::ScopeTarget;

/// Renames every reference to a variable inside one scope.
///
/// Two modes with deliberately asymmetric nesting rules:
///
/// - **Global**: renames only while the scope-nesting depth is zero, so
///   nested callables are skipped entirely — top-level code does not own the
///   bodies of the functions it defines.
/// - **Scoped**: renames everything textually between entering and leaving
///   the target scope node, nested callables included — a scope owns the
///   closures it creates.
///
/// Matching is exact name equality; parameters and closure captures count as
/// references. No shadowing or collision detection is performed.
pub struct ScopedVariableRenamer {
    old_name: String,
    new_name: String,
    target: ScopeTarget,
    in_target: bool,
    depth: u32,
}

impl ScopedVariableRenamer {
    pub fn new(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        target: ScopeTarget,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            in_target: target.is_global(),
            target,
            depth: 0,
        }
    }

    fn enter_scope(&mut self, id: crate::ast::NodeId) {
        match self.target {
            ScopeTarget::Global => self.depth += 1,
            ScopeTarget::Scope(target_id) if target_id == id => self.in_target = true,
            ScopeTarget::Scope(_) => {}
        }
    }

    fn leave_scope(&mut self, id: crate::ast::NodeId) {
        match self.target {
            ScopeTarget::Global => self.depth = self.depth.saturating_sub(1),
            ScopeTarget::Scope(target_id) if target_id == id => self.in_target = false,
            ScopeTarget::Scope(_) => {}
        }
    }

    fn renaming_active(&self) -> bool {
        match self.target {
            ScopeTarget::Global => self.depth == 0,
            ScopeTarget::Scope(_) => self.in_target,
        }
    }

    fn rename(&self, name: &mut String) {
        if self.renaming_active() && *name == self.old_name {
            *name = self.new_name.clone();
        }
    }
}

impl Rewriter for ScopedVariableRenamer {
    fn enter_stmt(&mut self, stmt: &Stmt) {
        if stmt.is_scope_introducing() {
            self.enter_scope(stmt.id);
        }
    }

    fn enter_expr(&mut self, expr: &Expr) {
        if expr.is_scope_introducing() {
            self.enter_scope(expr.id);
        }
    }

    fn enter_method(&mut self, method: &MethodDecl) {
        self.enter_scope(method.id);
    }

    fn rewrite_stmt(&mut self, stmt: Stmt) -> StmtEdit {
        if stmt.is_scope_introducing() {
            self.leave_scope(stmt.id);
        }
        StmtEdit::Stmt(stmt)
    }

    fn rewrite_expr(&mut self, mut expr: Expr) -> Expr {
        if let ExprKind::Variable(name) = &mut expr.kind {
            self.rename(name);
        }
        if expr.is_scope_introducing() {
            self.leave_scope(expr.id);
        }
        expr
    }

    fn rewrite_method(&mut self, method: MethodDecl) -> MethodDecl {
        self.leave_scope(method.id);
        method
    }

    fn rewrite_param(&mut self, mut param: Param) -> Param {
        self.rename(&mut param.name);
        param
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::ast::visit::rewrite_program;
    use crate::lang::{Parser, PhpParser, Printer, PhpPrinter};
    use crate::locate::ScopeFinder;

    fn rename_at_line(source: &str, line: u32, old: &str, new: &str) -> String {
        let program: Program = PhpParser::new().parse(source).unwrap();
        let target = ScopeFinder::find(&program, line);
        let rewritten =
            rewrite_program(program, &mut ScopedVariableRenamer::new(old, new, target));
        PhpPrinter::new().print(&rewritten)
    }

    const SIBLINGS: &str = "<?php\nfunction first()\n{\n    $count = 1;\n    return $count;\n}\nfunction second()\n{\n    $count = 2;\n    return $count;\n}";

    #[test]
    fn test_scoped_rename_stays_inside_function() {
        let printed = rename_at_line(SIBLINGS, 4, "count", "total");
        assert!(printed.contains("function first()\n{\n    $total = 1;\n    return $total;\n}"));
        // Sibling function untouched.
        assert!(printed.contains("function second()\n{\n    $count = 2;\n    return $count;\n}"));
    }

    #[test]
    fn test_scoped_rename_includes_nested_closure() {
        let source = "<?php\nfunction outer()\n{\n    $n = 1;\n    $f = function ($n) use ($n) {\n        return $n;\n    };\n    return $n;\n}";
        let printed = rename_at_line(source, 4, "n", "m");
        // Everything inside outer() is renamed, including the closure's
        // parameter, capture, and body.
        assert!(!printed.contains("$n"));
        assert!(printed.contains("function ($m) use ($m)"));
        assert!(printed.contains("$m = 1;"));
    }

    #[test]
    fn test_scoped_rename_renames_parameters() {
        let source = "<?php\nfunction scale($value, $factor)\n{\n    return $value * $factor;\n}";
        let printed = rename_at_line(source, 3, "value", "amount");
        assert!(printed.contains("function scale($amount, $factor)"));
        assert!(printed.contains("return $amount * $factor;"));
    }

    #[test]
    fn test_global_rename_skips_all_callables() {
        let source = "<?php\n$mode = 1;\nfunction f()\n{\n    $mode = 2;\n    return $mode;\n}\necho $mode;";
        let printed = rename_at_line(source, 2, "mode", "state");
        assert!(printed.contains("$state = 1;"));
        assert!(printed.contains("echo $state;"));
        // Inside the function nothing changes.
        assert!(printed.contains("$mode = 2;"));
        assert!(printed.contains("return $mode;"));
    }

    #[test]
    fn test_global_rename_skips_closures_in_top_level_code() {
        let source = "<?php\n$x = 1;\n$f = function () {\n    $x = 2;\n    return $x;\n};\necho $x;";
        let printed = rename_at_line(source, 2, "x", "y");
        assert!(printed.contains("$y = 1;"));
        assert!(printed.contains("echo $y;"));
        assert!(printed.contains("$x = 2;"));
        assert!(printed.contains("return $x;"));
    }

    #[test]
    fn test_rename_matches_exact_name_only() {
        let source = "<?php\nfunction f()\n{\n    $value = 1;\n    $values = 2;\n    return $value + $values;\n}";
        let printed = rename_at_line(source, 4, "value", "v");
        assert!(printed.contains("$v = 1;"));
        assert!(printed.contains("$values = 2;"));
        assert!(printed.contains("return $v + $values;"));
    }
}
