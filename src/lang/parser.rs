//! Recursive-descent parser for the PHP subset.
//!
//! Assigns every node a fresh [`NodeId`] and a [`Span`] derived from its
//! first and last token. Identifiers double as keywords; the parser decides
//! by position.

use crate::ast::{
    BinaryOp, ClassDecl, Expr, ExprKind, FunctionDecl, MethodDecl, NodeId, Param, Program, Span,
    Stmt, StmtKind, UnaryOp, Visibility,
};
use crate::error::{RefactorError, Result};

use super::Parser;
use super::lexer::{Lexer, Token, TokenKind};

/// The built-in parser implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpParser;

impl PhpParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PhpParser {
    fn parse(&self, source: &str) -> Result<Program> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut session = Session {
            tokens,
            pos: 0,
            ids: 0,
        };
        session.parse_program()
    }
}

struct Session {
    tokens: Vec<Token>,
    pos: usize,
    ids: NodeId,
}

impl Session {
    fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Program { stmts })
    }

    // ---- statements ----

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let keyword = match self.peek() {
            TokenKind::Ident(name) => Some(name.clone()),
            _ => None,
        };
        match keyword.as_deref() {
            Some("function") if matches!(self.peek_at(1), TokenKind::Ident(_)) => {
                self.parse_function_decl()
            }
            Some("return") => self.parse_return(),
            Some("echo") => self.parse_echo(),
            Some("if") => self.parse_if(),
            Some("while") => self.parse_while(),
            Some("class") => self.parse_class(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let start = self.pos;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Semi)?;
        Ok(self.stmt_from(start, StmtKind::Expr(expr)))
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        let value = if matches!(self.peek(), TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semi)?;
        Ok(self.stmt_from(start, StmtKind::Return(value)))
    }

    fn parse_echo(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        let mut args = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::Semi)?;
        Ok(self.stmt_from(start, StmtKind::Echo(args)))
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_body = self.parse_block()?;
        let else_body = if self.eat_ident("else") {
            if self.at_ident("if") {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(self.stmt_from(
            start,
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(self.stmt_from(start, StmtKind::While { cond, body }))
    }

    fn parse_function_decl(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        let name = self.expect_name()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.stmt_from(start, StmtKind::Function(FunctionDecl { name, params, body })))
    }

    fn parse_class(&mut self) -> Result<Stmt> {
        let start = self.pos;
        self.bump();
        let name = self.expect_name()?;
        self.expect(&TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace) {
            methods.push(self.parse_method()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.stmt_from(start, StmtKind::Class(ClassDecl { name, methods })))
    }

    fn parse_method(&mut self) -> Result<MethodDecl> {
        let start = self.pos;
        let visibility = if self.eat_ident("public") {
            Visibility::Public
        } else if self.eat_ident("protected") {
            Visibility::Protected
        } else if self.eat_ident("private") {
            Visibility::Private
        } else {
            Visibility::Public
        };
        if !self.eat_ident("function") {
            return Err(self.unexpected());
        }
        let name = self.expect_name()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(MethodDecl {
            id: self.next_id(),
            span: self.span_from(start),
            visibility,
            name,
            params,
            body,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace) {
            if matches!(self.peek(), TokenKind::Eof) {
                return Err(self.unexpected());
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !matches!(self.peek(), TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param> {
        let start = self.pos;
        match self.peek().clone() {
            TokenKind::Variable(name) => {
                self.bump();
                Ok(Param {
                    id: self.next_id(),
                    span: self.span_from(start),
                    name,
                })
            }
            _ => Err(self.unexpected()),
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Result<Expr> {
        let start = self.pos;
        let lhs = self.parse_binary(0)?;
        if matches!(self.peek(), TokenKind::Assign) {
            if !matches!(
                lhs.kind,
                ExprKind::Variable(_) | ExprKind::List(_) | ExprKind::PropertyFetch { .. }
            ) {
                return Err(self.unexpected());
            }
            self.bump();
            let value = self.parse_assign()?;
            return Ok(self.expr_from(
                start,
                ExprKind::Assign {
                    target: Box::new(lhs),
                    value: Box::new(value),
                },
            ));
        }
        Ok(lhs)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr> {
        let start = self.pos;
        let mut lhs = self.parse_unary()?;
        loop {
            let Some(op) = binary_op(self.peek()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = self.expr_from(
                start,
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let start = self.pos;
        let op = match self.peek() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(self.expr_from(
                start,
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let start = self.pos;
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Arrow) {
            let name = self.expect_name()?;
            if matches!(self.peek(), TokenKind::LParen) {
                let args = self.parse_args()?;
                expr = self.expr_from(
                    start,
                    ExprKind::MethodCall {
                        receiver: Box::new(expr),
                        method: name,
                        args,
                    },
                );
            } else {
                expr = self.expr_from(
                    start,
                    ExprKind::PropertyFetch {
                        receiver: Box::new(expr),
                        property: name,
                    },
                );
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.pos;
        match self.peek().clone() {
            TokenKind::Variable(name) => {
                self.bump();
                Ok(self.expr_from(start, ExprKind::Variable(name)))
            }
            TokenKind::Int(value) => {
                self.bump();
                Ok(self.expr_from(start, ExprKind::Int(value)))
            }
            TokenKind::Float(value) => {
                self.bump();
                Ok(self.expr_from(start, ExprKind::Float(value)))
            }
            TokenKind::Str(value) => {
                self.bump();
                Ok(self.expr_from(start, ExprKind::Str(value)))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.bump();
                let mut items = Vec::new();
                while !matches!(self.peek(), TokenKind::RBracket) {
                    items.push(self.parse_expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                Ok(self.expr_from(start, ExprKind::Array(items)))
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" => {
                    self.bump();
                    Ok(self.expr_from(start, ExprKind::Bool(true)))
                }
                "false" => {
                    self.bump();
                    Ok(self.expr_from(start, ExprKind::Bool(false)))
                }
                "null" => {
                    self.bump();
                    Ok(self.expr_from(start, ExprKind::Null))
                }
                "list" => {
                    self.bump();
                    self.expect(&TokenKind::LParen)?;
                    let mut items = Vec::new();
                    while !matches!(self.peek(), TokenKind::RParen) {
                        items.push(self.parse_expr()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    Ok(self.expr_from(start, ExprKind::List(items)))
                }
                "function" => self.parse_closure(),
                "fn" => self.parse_arrow_fn(),
                _ => {
                    self.bump();
                    if !matches!(self.peek(), TokenKind::LParen) {
                        return Err(self.unexpected());
                    }
                    let args = self.parse_args()?;
                    Ok(self.expr_from(start, ExprKind::Call { name, args }))
                }
            },
            _ => Err(self.unexpected()),
        }
    }

    fn parse_closure(&mut self) -> Result<Expr> {
        let start = self.pos;
        self.bump();
        let params = self.parse_params()?;
        let uses = if self.eat_ident("use") {
            self.parse_params()?
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;
        Ok(self.expr_from(start, ExprKind::Closure { params, uses, body }))
    }

    fn parse_arrow_fn(&mut self) -> Result<Expr> {
        let start = self.pos;
        self.bump();
        let params = self.parse_params()?;
        self.expect(&TokenKind::DoubleArrow)?;
        let body = self.parse_expr()?;
        Ok(self.expr_from(
            start,
            ExprKind::ArrowFn {
                params,
                body: Box::new(body),
            },
        ))
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !matches!(self.peek(), TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    // ---- token plumbing ----

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn bump(&mut self) -> &Token {
        let idx = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn at_ident(&self, keyword: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(name) if name == keyword)
    }

    fn eat_ident(&mut self, keyword: &str) -> bool {
        if self.at_ident(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn unexpected(&self) -> RefactorError {
        let token = &self.tokens[self.pos];
        RefactorError::Parse {
            message: format!(
                "Syntax error, unexpected {} on line {}",
                token.kind.describe(),
                token.line
            ),
        }
    }

    fn next_id(&mut self) -> NodeId {
        self.ids += 1;
        self.ids
    }

    fn span_from(&self, start_token: usize) -> Span {
        let first = &self.tokens[start_token];
        let last = &self.tokens[self.pos.saturating_sub(1).max(start_token)];
        Span {
            start_line: first.line,
            end_line: last.end_line,
            start_offset: first.start,
            end_offset: last.end,
        }
    }

    fn stmt_from(&mut self, start_token: usize, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.next_id(),
            span: self.span_from(start_token),
            kind,
        }
    }

    fn expr_from(&mut self, start_token: usize, kind: ExprKind) -> Expr {
        Expr {
            id: self.next_id(),
            span: self.span_from(start_token),
            kind,
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::OrOr => Some(BinaryOp::Or),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Identical => Some(BinaryOp::Identical),
        TokenKind::NotIdentical => Some(BinaryOp::NotIdentical),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Ge => Some(BinaryOp::Ge),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Dot => Some(BinaryOp::Concat),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        PhpParser::new().parse(source).unwrap()
    }

    #[test]
    fn test_parses_assignment_with_positions() {
        let program = parse("<?php\n$x = 5;\n$y = $x * 2;");
        assert_eq!(program.stmts.len(), 2);
        assert_eq!(program.stmts[0].span.start_line, 2);
        assert_eq!(program.stmts[1].span.start_line, 3);

        let StmtKind::Expr(expr) = &program.stmts[1].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { target, value } = &expr.kind else {
            panic!("expected assignment");
        };
        assert_eq!(target.kind, ExprKind::Variable("y".into()));
        assert!(matches!(
            value.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let program = parse("<?php\n$x = 1 + 2;\n$y = $x;");
        let mut ids = Vec::new();
        struct Collect<'a>(&'a mut Vec<NodeId>);
        impl crate::ast::visit::Visitor for Collect<'_> {
            fn enter_stmt(&mut self, stmt: &Stmt) {
                self.0.push(stmt.id);
            }
            fn enter_expr(&mut self, expr: &Expr) {
                self.0.push(expr.id);
            }
        }
        crate::ast::visit::walk_program(&program, &mut Collect(&mut ids));
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }

    #[test]
    fn test_precedence_and_associativity() {
        let program = parse("<?php\n$r = 1 + 2 * 3 - 4;");
        let StmtKind::Expr(expr) = &program.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { value, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        // ((1 + (2 * 3)) - 4)
        let ExprKind::Binary {
            op: BinaryOp::Sub,
            lhs,
            ..
        } = &value.kind
        else {
            panic!("expected subtraction at the top");
        };
        let ExprKind::Binary {
            op: BinaryOp::Add,
            rhs,
            ..
        } = &lhs.kind
        else {
            panic!("expected addition on the left");
        };
        assert!(matches!(
            rhs.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_parses_class_with_methods() {
        let source = "<?php\nclass Calculator\n{\n    public function calculate()\n    {\n        $x = 5;\n        return $x;\n    }\n}";
        let program = parse(source);
        let StmtKind::Class(class) = &program.stmts[0].kind else {
            panic!("expected class");
        };
        assert_eq!(class.name, "Calculator");
        assert_eq!(class.methods.len(), 1);
        let method = &class.methods[0];
        assert_eq!(method.name, "calculate");
        assert_eq!(method.visibility, Visibility::Public);
        assert_eq!(method.body.len(), 2);
        assert_eq!(method.body[0].span.start_line, 6);
        assert_eq!(method.body[1].span.start_line, 7);
    }

    #[test]
    fn test_parses_method_call_and_property_fetch() {
        let program = parse("<?php\n$this->total = $this->add(1, 2);");
        let StmtKind::Expr(expr) = &program.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { target, value } = &expr.kind else {
            panic!("expected assignment");
        };
        assert!(matches!(target.kind, ExprKind::PropertyFetch { .. }));
        let ExprKind::MethodCall { method, args, .. } = &value.kind else {
            panic!("expected method call");
        };
        assert_eq!(method, "add");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_parses_closure_with_use() {
        let program = parse("<?php\n$f = function ($a) use ($b) {\n    return $a + $b;\n};");
        let StmtKind::Expr(expr) = &program.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { value, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Closure { params, uses, body } = &value.kind else {
            panic!("expected closure");
        };
        assert_eq!(params[0].name, "a");
        assert_eq!(uses[0].name, "b");
        assert_eq!(body.len(), 1);
        assert_eq!(value.span.start_line, 2);
        assert_eq!(value.span.end_line, 4);
    }

    #[test]
    fn test_parses_arrow_fn_and_list_destructuring() {
        let program = parse("<?php\n$double = fn ($x) => $x * 2;\nlist($a, $b) = $pair;");
        assert_eq!(program.stmts.len(), 2);
        let StmtKind::Expr(expr) = &program.stmts[1].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { target, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        let ExprKind::List(items) = &target.kind else {
            panic!("expected list target");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_if_else_chain() {
        let program = parse(
            "<?php\nif ($a) {\n    $x = 1;\n} else if ($b) {\n    $x = 2;\n} else {\n    $x = 3;\n}",
        );
        let StmtKind::If { else_body, .. } = &program.stmts[0].kind else {
            panic!("expected if");
        };
        let nested = else_body.as_ref().unwrap();
        assert_eq!(nested.len(), 1);
        assert!(matches!(nested[0].kind, StmtKind::If { .. }));
    }

    #[test]
    fn test_syntax_error_names_line() {
        let err = PhpParser::new().parse("<?php\n$x = ;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: Syntax error, unexpected ';' on line 2"
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = PhpParser::new().parse("<?php\n1 + 2 = $x;").unwrap_err();
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn test_offsets_back_containment() {
        let program = parse("<?php\n$r = 1 + 2;");
        let StmtKind::Expr(expr) = &program.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { value, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { lhs, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert!(value.span.encloses(&lhs.span));
        assert!(expr.span.encloses(&value.span));
    }
}
