//! Extracts a statement sequence into a new private method.

use crate::ast::visit::{Rewriter, StmtEdit};
use crate::ast::{
    Expr, ExprKind, MethodDecl, NodeId, Param, RECEIVER_NAME, Stmt, StmtKind, Visibility,
};

/// Everything the extraction rewrite needs, computed by the finder and flow
/// passes.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    /// Statements to move into the new method (deep clones, document order).
    pub statements: Vec<Stmt>,
    /// Callable whose body gets the call site, if the range sat inside one.
    pub callable_id: Option<NodeId>,
    /// Class receiving the new method.
    pub class_id: NodeId,
    /// Name for the new method.
    pub method_name: String,
    /// Parameter names, in first-use order.
    pub parameters: Vec<String>,
    /// Return variable names, in first-assignment order.
    pub return_variables: Vec<String>,
    pub start_line: u32,
    pub end_line: u32,
}

/// Single-shot rewriter applying an [`ExtractionPlan`].
///
/// Appends the synthesized method to the matched class and partitions the
/// enclosing callable's statement list: statements before the range are
/// kept, the first statement starting inside the range becomes the call
/// statement, the remaining in-range statements are dropped (they moved into
/// the new method), statements after the range are kept.
pub struct MethodExtractor {
    plan: ExtractionPlan,
    method_added: bool,
    extracted: bool,
}

impl MethodExtractor {
    pub fn new(plan: ExtractionPlan) -> Self {
        Self {
            plan,
            method_added: false,
            extracted: false,
        }
    }

    /// The new method: deep copies of the extracted statements plus a
    /// trailing return when the block hands variables back.
    fn build_method(&self) -> MethodDecl {
        let mut body = self.plan.statements.clone();
        match self.plan.return_variables.as_slice() {
            [] => {}
            [single] => {
                body.push(Stmt::synthetic(StmtKind::Return(Some(Expr::variable(
                    single.clone(),
                )))));
            }
            many => {
                let items = many.iter().map(|name| Expr::variable(name.clone())).collect();
                body.push(Stmt::synthetic(StmtKind::Return(Some(Expr::synthetic(
                    ExprKind::Array(items),
                )))));
            }
        }

        MethodDecl {
            id: crate::ast::SYNTHETIC,
            span: Default::default(),
            visibility: Visibility::Private,
            name: self.plan.method_name.clone(),
            params: self
                .plan
                .parameters
                .iter()
                .map(|name| Param::synthetic(name.as_str()))
                .collect(),
            body,
        }
    }

    /// The statement that replaces the extracted block at the call site.
    fn build_call_stmt(&self) -> Stmt {
        let args = self
            .plan
            .parameters
            .iter()
            .map(|name| Expr::variable(name.clone()))
            .collect();
        let call = Expr::synthetic(ExprKind::MethodCall {
            receiver: Box::new(Expr::variable(RECEIVER_NAME)),
            method: self.plan.method_name.clone(),
            args,
        });

        let expr = match self.plan.return_variables.as_slice() {
            [] => call,
            [single] => Expr::synthetic(ExprKind::Assign {
                target: Box::new(Expr::variable(single.clone())),
                value: Box::new(call),
            }),
            many => {
                let items = many.iter().map(|name| Expr::variable(name.clone())).collect();
                Expr::synthetic(ExprKind::Assign {
                    target: Box::new(Expr::synthetic(ExprKind::List(items))),
                    value: Box::new(call),
                })
            }
        };
        Stmt::synthetic(StmtKind::Expr(expr))
    }

    /// Partition a callable body around the extracted range by start line.
    fn partition(&self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        let mut out = Vec::with_capacity(stmts.len());
        let mut replaced = false;
        for stmt in stmts {
            let line = stmt.span.start_line;
            if line < self.plan.start_line {
                out.push(stmt);
            } else if line <= self.plan.end_line && !replaced {
                replaced = true;
                out.push(self.build_call_stmt());
            } else if line <= self.plan.end_line {
                // Already relocated into the new method.
            } else {
                out.push(stmt);
            }
        }
        out
    }
}

impl Rewriter for MethodExtractor {
    fn rewrite_stmt(&mut self, mut stmt: Stmt) -> StmtEdit {
        match &mut stmt.kind {
            StmtKind::Class(class) if stmt.id == self.plan.class_id && !self.method_added => {
                self.method_added = true;
                class.methods.push(self.build_method());
            }
            StmtKind::Function(func)
                if Some(stmt.id) == self.plan.callable_id && !self.extracted =>
            {
                self.extracted = true;
                func.body = self.partition(std::mem::take(&mut func.body));
            }
            _ => {}
        }
        StmtEdit::Stmt(stmt)
    }

    fn rewrite_method(&mut self, mut method: MethodDecl) -> MethodDecl {
        if Some(method.id) == self.plan.callable_id && !self.extracted {
            self.extracted = true;
            method.body = self.partition(std::mem::take(&mut method.body));
        }
        method
    }
}
