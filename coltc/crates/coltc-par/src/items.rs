//! Declarations: functions, variables, and typenames.

use coltc_lex::Token;

use crate::ast::{Expr, ExprKind};
use crate::context::{ExprId, TypeId};
use crate::types::BuiltinId;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a top-level declaration: a function, or a global variable.
    pub(crate) fn parse_global_declaration(&mut self) -> ExprId {
        if self.current == Token::KeywordFn {
            self.parse_fn_decl()
        } else {
            self.parse_variable_decl(true)
        }
    }

    /// Parse a function declaration or definition:
    /// `fn NAME ( (TYPE NAME,)* ) -> TYPE BODY`, where `BODY` is `: STMT`,
    /// a block, or `;` for a declaration-only (extern) function.
    ///
    /// The definition is registered in the global table before the body is
    /// parsed, and the body is assigned afterwards, so recursive calls
    /// resolve.
    pub(crate) fn parse_fn_decl(&mut self) -> ExprId {
        let start = self.span_start();

        debug_assert_eq!(self.current, Token::KeywordFn);
        self.consume_current();

        let fn_name = self.lexer.parsed_identifier();
        let not_an_identifier = format!("Expected an identifier, not '{}'!", self.lexer.lexeme());
        if !self.expect(Token::Identifier, &not_an_identifier) {
            return self.error_node();
        }
        if !self.expect(Token::LeftParen, "Expected a '('!") {
            return self.error_node();
        }

        let mut param_types: Vec<TypeId> = Vec::new();
        let mut param_names = Vec::new();
        while !matches!(self.current, Token::Eof | Token::RightParen) {
            let param_type = self.parse_typename();
            let param_name = self.lexer.parsed_identifier();
            let param_span = self.current_lexeme_span();
            if !self.expect(Token::Identifier, "Expected an identifier!") {
                self.panic_consume_rparen();
                break;
            }

            if param_names.contains(&param_name) {
                self.handler.error(
                    format!("Cannot have parameters of same name '{}'!", param_name),
                    param_span,
                );
                self.panic_consume_rparen();
                break;
            }
            param_names.push(param_name);
            param_types.push(param_type);

            if self.current == Token::RightParen {
                break;
            }
            if !self.expect(Token::Comma, "Expected a ','!") {
                self.panic_consume_rparen();
                break;
            }
        }

        self.expect(Token::RightParen, "Expected a ')'!");
        self.expect(Token::MinusGreat, "Expected a '->'!");
        let return_type = self.parse_typename();

        let fn_type = self.ctx.fn_type(return_type, param_types, false);
        let decl_span = self.span_from(start);
        let decl = self.ctx.push_expr(Expr::new(
            ExprKind::FnDecl {
                name: fn_name,
                params: param_names,
            },
            fn_type,
            decl_span,
        ));
        let def = self
            .ctx
            .push_expr(Expr::new(ExprKind::FnDef { decl, body: None }, fn_type, decl_span));
        self.globals.insert(fn_name, def);

        if matches!(self.current, Token::LeftCurly | Token::Colon) {
            self.current_fn = Some(decl);
            let body = self.parse_scope(true);
            self.current_fn = None;
            self.ctx.set_fn_body(def, body);
        } else {
            self.expect(Token::Semicolon, "Expected a ';'!");
        }
        def
    }

    /// Parse a variable declaration:
    /// `var NAME (: TYPE)? (= EXPR)? ;` with at least one of the type and
    /// the initialiser present. When both are present the initialiser is
    /// wrapped in a conversion to the declared type.
    pub(crate) fn parse_variable_decl(&mut self, is_global: bool) -> ExprId {
        let start = self.span_start();

        if !self.expect(Token::KeywordVar, "Expected a variable declaration!") {
            return self.error_node();
        }
        let var_name = self.lexer.parsed_identifier();
        if !self.expect(Token::Identifier, "Expected an identifier!") {
            return self.error_node();
        }

        let mut var_type = None;
        if self.current == Token::Colon {
            self.consume_current();
            var_type = Some(self.parse_typename());
        }

        let mut var_init = None;
        if self.current != Token::Semicolon {
            if !self.expect(Token::Equal, "Expected a '='!") {
                return self.error_node();
            }
            var_init = Some(self.parse_binary(0));
        } else if var_type.is_none() {
            return self.error_expr(
                start,
                "An uninitialized variable should specify its type!".to_string(),
            );
        }

        // No annotation deduces the type from the initialiser; an
        // annotation converts the initialiser to it
        let (ty, init) = match (var_type, var_init) {
            (None, Some(init)) => (self.ctx.expr(init).ty, Some(init)),
            (Some(ty), Some(init)) => {
                let span = self.span_from(start);
                let converted = self
                    .ctx
                    .push_expr(Expr::new(ExprKind::Convert { child: init }, ty, span));
                (ty, Some(converted))
            }
            (Some(ty), None) => (ty, None),
            (None, None) => {
                return self.error_expr(
                    start,
                    "An uninitialized variable should specify its type!".to_string(),
                );
            }
        };

        if !self.expect(Token::Semicolon, "Expected a ';'!") {
            return self.error_node();
        }

        let span = self.span_from(start);
        let decl = self.ctx.push_expr(Expr::new(
            ExprKind::VarDecl {
                name: var_name,
                init,
                global: is_global,
            },
            ty,
            span,
        ));
        if is_global {
            self.globals.insert(var_name, decl);
        } else {
            self.locals.push((var_name, ty));
        }
        decl
    }

    /// Parse a typename:
    /// `mut`? (`void` | built-in | `lstring` | `typeof(EXPR)` |
    /// `PTR < TYPE >` | IDENTIFIER). A failure produces the error type.
    pub(crate) fn parse_typename(&mut self) -> TypeId {
        let start = self.span_start();

        // typeof(10 + 5) is the type of the expression, unevaluated
        if self.current == Token::KeywordTypeof {
            self.consume_current();
            if !self.expect(Token::LeftParen, "Expected a '('!") {
                return self.ctx.error_type();
            }
            let inner = self.parse_binary(0);
            self.expect(Token::RightParen, "Expected a ')'!");
            return self.ctx.expr(inner).ty;
        }

        let mut is_mut = false;
        if self.current == Token::KeywordMut {
            is_mut = true;
            self.consume_current();
        }

        match self.current {
            Token::KeywordVoid => {
                self.consume_current();
                if is_mut {
                    let span = self.span_from(start);
                    self.handler
                        .error("'void' typename cannot be marked as mutable!", span);
                }
                self.ctx.void_type()
            }
            Token::KeywordBool => self.builtin_typename(BuiltinId::Bool, is_mut),
            Token::KeywordChar => self.builtin_typename(BuiltinId::Char, is_mut),
            Token::KeywordI8 => self.builtin_typename(BuiltinId::I8, is_mut),
            Token::KeywordU8 => self.builtin_typename(BuiltinId::U8, is_mut),
            Token::KeywordI16 => self.builtin_typename(BuiltinId::I16, is_mut),
            Token::KeywordU16 => self.builtin_typename(BuiltinId::U16, is_mut),
            Token::KeywordI32 => self.builtin_typename(BuiltinId::I32, is_mut),
            Token::KeywordU32 => self.builtin_typename(BuiltinId::U32, is_mut),
            Token::KeywordI64 => self.builtin_typename(BuiltinId::I64, is_mut),
            Token::KeywordU64 => self.builtin_typename(BuiltinId::U64, is_mut),
            Token::KeywordF32 => self.builtin_typename(BuiltinId::F32, is_mut),
            Token::KeywordF64 => self.builtin_typename(BuiltinId::F64, is_mut),
            Token::KeywordLstring => self.builtin_typename(BuiltinId::Lstring, is_mut),
            Token::KeywordPtr => {
                self.consume_current();
                if !self.expect(Token::Less, "Expected a '<'!") {
                    return self.ctx.error_type();
                }
                let pointee = self.parse_typename();
                if self.current == Token::GreatGreat {
                    // '>>' closing two nested pointer types is '>' '>'
                    self.current = Token::Great;
                    return self.ctx.ptr_type(is_mut, pointee);
                }
                if !self.expect(Token::Great, "Expected a '>'!") {
                    return self.ctx.error_type();
                }
                self.ctx.ptr_type(is_mut, pointee)
            }
            Token::Identifier => {
                let name = self.lexer.parsed_identifier();
                self.error_lexeme(format!("Unknown typename '{}'!", name));
                self.ctx.error_type()
            }
            _ => {
                self.error_lexeme("Expected a typename!".to_string());
                self.ctx.error_type()
            }
        }
    }

    fn builtin_typename(&mut self, id: BuiltinId, is_mut: bool) -> TypeId {
        self.consume_current();
        self.ctx.builtin_type(id, is_mut)
    }
}
