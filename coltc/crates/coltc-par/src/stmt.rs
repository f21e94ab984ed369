//! Statements, scopes and conditionals.

use coltc_lex::Token;

use crate::ast::{Expr, ExprKind};
use crate::context::ExprId;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a scope: a `{ STMT* }` block, or (when `one_expr` is set) the
    /// single-statement form `: STMT`.
    ///
    /// The local-variable stack is balanced across every exit path.
    pub(crate) fn parse_scope(&mut self, one_expr: bool) -> ExprId {
        let start = self.span_start();

        if self.current == Token::Colon && one_expr {
            self.consume_current();
            let stmt = self.with_scope(|p| p.parse_statement());
            let span = self.span_from(start);
            let ty = self.ctx.void_type();
            return self
                .ctx
                .push_expr(Expr::new(ExprKind::Scope { body: vec![stmt] }, ty, span));
        }

        if self.current == Token::LeftCurly {
            let open_span = self.current_lexeme_span();
            self.consume_current();

            let body = self.with_scope(|p| {
                let mut statements = Vec::new();
                while !matches!(p.current, Token::RightCurly | Token::Eof) {
                    statements.push(p.parse_statement());
                }
                statements
            });

            if self.current == Token::RightCurly {
                self.consume_current();
            } else {
                self.handler.error("Unclosed curly bracket delimiter!", open_span);
            }

            let span = self.span_from(start);
            let ty = self.ctx.void_type();
            return self
                .ctx
                .push_expr(Expr::new(ExprKind::Scope { body }, ty, span));
        }

        self.error_lexeme("Expected a scope!".to_string());
        self.error_node()
    }

    /// Parse a statement: a variable declaration, a block, a conditional,
    /// a return, or an expression statement.
    pub(crate) fn parse_statement(&mut self) -> ExprId {
        match self.current {
            Token::KeywordVar => self.parse_variable_decl(false),
            Token::LeftCurly => self.parse_scope(false),
            Token::KeywordIf => self.parse_condition(),
            Token::KeywordReturn => self.parse_return(),
            Token::Semicolon => {
                self.error_lexeme("Expected a statement!".to_string());
                self.error_node()
            }
            _ => {
                let errors_before = self.handler.error_count();
                let to_ret = self.parse_binary(0);
                // an error inside the expression already consumed the
                // semicolon while resynchronising
                if errors_before == self.handler.error_count()
                    || self.current == Token::Semicolon
                {
                    self.expect(Token::Semicolon, "Expected a ';'!");
                }
                to_ret
            }
        }
    }

    /// Parse `return EXPR? ;`.
    pub(crate) fn parse_return(&mut self) -> ExprId {
        let start = self.span_start();
        debug_assert_eq!(self.current, Token::KeywordReturn);
        self.consume_current();

        if self.current == Token::Semicolon {
            self.consume_current();
            let span = self.span_from(start);
            let ty = self.ctx.void_type();
            return self
                .ctx
                .push_expr(Expr::new(ExprKind::FnReturn { value: None }, ty, span));
        }

        let errors_before = self.handler.error_count();
        let value = self.parse_binary(0);
        if errors_before == self.handler.error_count() || self.current == Token::Semicolon {
            self.expect(Token::Semicolon, "Expected a ';'!");
        }

        let ty = self.ctx.expr(value).ty;
        let span = self.span_from(start);
        self.ctx.push_expr(Expr::new(
            ExprKind::FnReturn {
                value: Some(value),
            },
            ty,
            span,
        ))
    }

    /// Parse `if EXPR SCOPE (elif EXPR SCOPE)* (else SCOPE)?`.
    ///
    /// `elif` chains desugar to a nested conditional in the else slot.
    pub(crate) fn parse_condition(&mut self) -> ExprId {
        let start = self.span_start();
        debug_assert!(matches!(self.current, Token::KeywordIf | Token::KeywordElif));
        self.consume_current();

        let cond = self.parse_binary(0);
        let then = self.parse_scope(true);

        let otherwise = match self.current {
            Token::KeywordElif => Some(self.parse_condition()),
            Token::KeywordElse => {
                self.consume_current();
                Some(self.parse_scope(true))
            }
            _ => None,
        };

        let span = self.span_from(start);
        let ty = self.ctx.void_type();
        self.ctx.push_expr(Expr::new(
            ExprKind::Condition {
                cond,
                then,
                otherwise,
            },
            ty,
            span,
        ))
    }
}
