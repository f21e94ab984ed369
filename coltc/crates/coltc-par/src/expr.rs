//! Expression parsing (Pratt operator-precedence climbing).
//!
//! `parse_binary` climbs the precedence table carried by the token
//! alphabet: while the current operator binds tighter than the ambient
//! precedence, the right-hand side is parsed at the operator's own
//! precedence, which groups equal-precedence operators to the left.
//! Assignments are right-associative and handled separately. A token with
//! the 255 sentinel precedence terminates the climb; terminators such as
//! `;` are the caller's concern.

use coltc_lex::{LineInfo, Token, PRECEDENCE_NONE};

use crate::ast::{Expr, ExprKind};
use crate::context::ExprId;
use crate::operators::{BinaryOp, UnaryOp};
use crate::types::BuiltinId;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a binary expression with the given minimum precedence.
    pub(crate) fn parse_binary(&mut self, precedence: u8) -> ExprId {
        let start = self.span_start();

        let mut lhs = self.parse_primary();
        let mut binary_op = self.current;

        // Assignment operators are right associative and handled apart
        if binary_op.is_assignment() {
            return self.parse_assignment(lhs, start);
        }

        let mut op_prec = binary_op.precedence();
        while op_prec != PRECEDENCE_NONE && op_prec > precedence {
            self.consume_current();
            let rhs = self.parse_binary(binary_op.precedence());

            let Some(op) = BinaryOp::from_token(binary_op) else {
                unreachable!("token {:?} has operator precedence", binary_op)
            };
            let span = self.span_from(start);
            if self.binary_op_supported(op, lhs, rhs, span) {
                let ty = self.ctx.expr(lhs).ty;
                lhs = self
                    .ctx
                    .push_expr(Expr::new(ExprKind::Binary { op, lhs, rhs }, ty, span));
            } else {
                lhs = self.error_node();
            }

            binary_op = self.current;
            op_prec = binary_op.precedence();
        }

        lhs
    }

    /// Check a binary operation's operands: both sides must have the same
    /// type (ignoring top-level mutability), and when that type is a
    /// built-in it must support the operator. Error-typed operands were
    /// already diagnosed and skip the check.
    fn binary_op_supported(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: coltc_util::SourceSpan,
    ) -> bool {
        let lhs_ty = self.ctx.expr(lhs).ty;
        let rhs_ty = self.ctx.expr(rhs).ty;
        if self.ctx.ty(lhs_ty).is_error() || self.ctx.ty(rhs_ty).is_error() {
            return true;
        }

        if !self.ctx.same_type_modulo_mut(lhs_ty, rhs_ty) {
            let msg = format!(
                "Binary operator '{}' cannot be applied to operands of types '{}' and '{}'!",
                op,
                self.ctx.type_name(lhs_ty),
                self.ctx.type_name(rhs_ty)
            );
            self.handler.error(msg, span);
            self.panic_consume();
            return false;
        }

        let Some(id) = self.ctx.ty(lhs_ty).builtin_id() else {
            return true;
        };
        if crate::types::supports(id, op) {
            return true;
        }
        self.handler.error(
            format!("Binary operator '{}' is not supported by type '{}'!", op, id.name()),
            span,
        );
        self.panic_consume();
        false
    }

    /// Parse the right-hand side of an assignment to `lhs`.
    ///
    /// Right associative: `a = b = c` parses as `a = (b = c)`. Compound
    /// assignments desugar to a write of the corresponding binary
    /// operation, `x += e` to `x = x + e`.
    pub(crate) fn parse_assignment(&mut self, lhs: ExprId, start: LineInfo) -> ExprId {
        let assignment_tkn = self.current;
        self.consume_current();
        let rhs = self.parse_binary(0);

        let (name, local_id) = match &self.ctx.expr(lhs).kind {
            ExprKind::VarRead { name, local_id } => (*name, *local_id),
            _ => {
                return self.error_expr(
                    start,
                    "Left hand side of an assignment should be a variable!".to_string(),
                );
            }
        };

        let ty = self.ctx.expr(lhs).ty;
        let span = self.span_from(start);
        let Some(op) = BinaryOp::from_token(assignment_tkn) else {
            unreachable!("token {:?} is an assignment", assignment_tkn)
        };
        let value = match op.compound_base() {
            None => rhs,
            Some(base) => self
                .ctx
                .push_expr(Expr::new(ExprKind::Binary { op: base, lhs, rhs }, ty, span)),
        };

        self.ctx.push_expr(Expr::new(
            ExprKind::VarWrite {
                name,
                value,
                local_id,
            },
            ty,
            span,
        ))
    }

    /// Parse a primary expression: a literal, unary, identifier, call, or
    /// parenthesised sub-expression, with trailing `++`/`--` applied.
    pub(crate) fn parse_primary(&mut self) -> ExprId {
        let start = self.span_start();

        let mut to_ret = match self.current {
            Token::BoolLit => self.parse_literal(start, BuiltinId::Bool),
            Token::CharLit => self.parse_literal(start, BuiltinId::Char),
            Token::U8Lit => self.parse_literal(start, BuiltinId::U8),
            Token::U16Lit => self.parse_literal(start, BuiltinId::U16),
            Token::U32Lit => self.parse_literal(start, BuiltinId::U32),
            Token::U64Lit => self.parse_literal(start, BuiltinId::U64),
            Token::I8Lit => self.parse_literal(start, BuiltinId::I8),
            Token::I16Lit => self.parse_literal(start, BuiltinId::I16),
            Token::I32Lit => self.parse_literal(start, BuiltinId::I32),
            Token::I64Lit => self.parse_literal(start, BuiltinId::I64),
            Token::FloatLit => self.parse_literal(start, BuiltinId::F32),
            Token::DoubleLit => self.parse_literal(start, BuiltinId::F64),

            Token::StringLit => {
                self.consume_current();
                self.error_expr(start, "String literals are not yet supported!".to_string())
            }

            // the lexer already reported the error
            Token::Error => {
                self.consume_current();
                self.error_node()
            }

            Token::Identifier => self.parse_identifier_expr(),

            Token::LeftParen => {
                self.consume_current();
                let inner = self.parse_binary(0);
                self.expect(Token::RightParen, "Expected a ')'!");
                inner
            }

            Token::Amp
            | Token::PlusPlus
            | Token::MinusMinus
            | Token::Star
            | Token::Tilde
            | Token::Bang
            | Token::Minus
            | Token::Plus => self.parse_unary(),

            _ => {
                self.error_lexeme("Expected an expression!".to_string());
                return self.error_node();
            }
        };

        // Post increment/decrement
        if matches!(self.current, Token::PlusPlus | Token::MinusMinus) {
            let Some(op) = UnaryOp::from_token(self.current, true) else {
                unreachable!("++/-- are unary operators")
            };
            self.consume_current();
            let ty = self.ctx.expr(to_ret).ty;
            let span = self.span_from(start);
            to_ret = self
                .ctx
                .push_expr(Expr::new(ExprKind::Unary { op, child: to_ret }, ty, span));
        }
        to_ret
    }

    /// Parse a prefix unary expression. Prefix `+` is a no-op returning
    /// its operand.
    pub(crate) fn parse_unary(&mut self) -> ExprId {
        let start = self.span_start();
        let op_tkn = self.current;
        self.consume_current();

        if op_tkn == Token::Plus {
            return self.parse_primary();
        }

        let child = self.parse_primary();
        let Some(op) = UnaryOp::from_token(op_tkn, false) else {
            unreachable!("token {:?} is a prefix operator", op_tkn)
        };
        let ty = self.ctx.expr(child).ty;
        let span = self.span_from(start);
        self.ctx
            .push_expr(Expr::new(ExprKind::Unary { op, child }, ty, span))
    }

    /// Consume a literal token and build its node; the literal's type is
    /// the non-mutable built-in matching the token tag.
    fn parse_literal(&mut self, start: LineInfo, id: BuiltinId) -> ExprId {
        let value = self.lexer.parsed_value();
        self.consume_current();
        let ty = self.ctx.builtin_type(id, false);
        let span = self.span_from(start);
        self.ctx
            .push_expr(Expr::new(ExprKind::Literal { value }, ty, span))
    }

    /// Parse an identifier in expression position: a function call, or a
    /// variable read resolved against the local table (innermost scopes
    /// win), then the current function's parameters. Global variable
    /// reads are not resolved.
    fn parse_identifier_expr(&mut self) -> ExprId {
        let start = self.span_start();
        let name = self.lexer.parsed_identifier();
        self.consume_current();

        if self.current == Token::LeftParen {
            return self.parse_function_call(name, start);
        }

        if self.current_fn.is_some() {
            for i in (0..self.locals.len()).rev() {
                if self.locals[i].0 == name {
                    let ty = self.locals[i].1;
                    let span = self.span_from(start);
                    return self.ctx.push_expr(Expr::new(
                        ExprKind::VarRead {
                            name,
                            local_id: Some(i),
                        },
                        ty,
                        span,
                    ));
                }
            }

            let param_ty = self.current_fn.and_then(|decl_id| {
                let decl = self.ctx.expr(decl_id);
                let sig = self.ctx.ty(decl.ty).fn_sig()?;
                match &decl.kind {
                    ExprKind::FnDecl { params, .. } => params
                        .iter()
                        .position(|p| *p == name)
                        .map(|i| sig.params[i]),
                    _ => None,
                }
            });
            if let Some(ty) = param_ty {
                let span = self.span_from(start);
                return self.ctx.push_expr(Expr::new(
                    ExprKind::VarRead {
                        name,
                        local_id: None,
                    },
                    ty,
                    span,
                ));
            }
        }

        self.error_expr(start, format!("Variable of name '{}' does not exist!", name))
    }

    /// Parse a function call's arguments and validate the call against
    /// the declaration found in the global table.
    fn parse_function_call(&mut self, name: coltc_util::Symbol, start: LineInfo) -> ExprId {
        let identifier_span = crate::span_of(start);

        self.consume_current(); // (
        let mut args = Vec::new();
        if !matches!(self.current, Token::RightParen | Token::Eof) {
            args.push(self.parse_binary(0));
        }
        while !matches!(self.current, Token::RightParen | Token::Eof) {
            if !self.expect(Token::Comma, "Expected a ')'!") {
                break;
            }
            args.push(self.parse_binary(0));
        }
        self.expect(Token::RightParen, "Expected a ')'!");

        let Some(&found) = self.globals.get(&name) else {
            self.handler.error(
                format!("Function of name '{}' does not exist!", name),
                identifier_span,
            );
            self.panic_consume();
            return self.error_node();
        };

        let decl_id = match self.ctx.expr(found).kind {
            ExprKind::FnDef { decl, .. } => decl,
            _ => {
                self.handler
                    .error(format!("'{}' is not a function!", name), identifier_span);
                self.panic_consume();
                return self.error_node();
            }
        };

        if !self.validate_fn_call(&args, decl_id, name, identifier_span) {
            return self.error_node();
        }

        let ret = self
            .ctx
            .ty(self.ctx.expr(decl_id).ty)
            .fn_sig()
            .map(|sig| sig.ret)
            .unwrap_or_else(|| self.ctx.error_type());
        let span = self.span_from(start);
        self.ctx.push_expr(Expr::new(
            ExprKind::FnCall {
                decl: decl_id,
                args,
            },
            ret,
            span,
        ))
    }

    /// Validate arity and per-argument type identity of a call. Returns
    /// true if the call is well-formed.
    fn validate_fn_call(
        &mut self,
        args: &[ExprId],
        decl_id: ExprId,
        name: coltc_util::Symbol,
        identifier_span: coltc_util::SourceSpan,
    ) -> bool {
        let param_tys: Vec<_> = match self.ctx.ty(self.ctx.expr(decl_id).ty).fn_sig() {
            Some(sig) => sig.params.clone(),
            None => return false,
        };

        if args.len() != param_tys.len() {
            let plural = if param_tys.len() == 1 { "," } else { "s," };
            self.handler.error(
                format!(
                    "Function '{}' expects {} argument{} not {}!",
                    name,
                    param_tys.len(),
                    plural,
                    args.len()
                ),
                identifier_span,
            );
            return false;
        }

        let mut ok = true;
        for (arg, param_ty) in args.iter().zip(param_tys) {
            let arg_ty = self.ctx.expr(*arg).ty;
            if self.ctx.ty(arg_ty).is_error() || self.ctx.ty(param_ty).is_error() {
                continue;
            }
            if !self.ctx.same_type_modulo_mut(arg_ty, param_ty) {
                let span = self.ctx.expr(*arg).span;
                self.handler
                    .error("Type of argument does not match that of declaration!", span);
                ok = false;
            }
        }
        ok
    }
}
