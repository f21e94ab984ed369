//! coltc-par - Parser for the Colt language.
//!
//! Couples a Pratt expression parser with a recursive-descent
//! statement/declaration parser. The parser drives the lexer one token at
//! a time and builds every AST and type node inside an [`AstContext`];
//! diagnostics go through the shared [`Handler`] and are recovered with
//! panic-mode resynchronisation, so one pass reports as many errors as
//! possible.
//!
//! # Example
//!
//! ```
//! use coltc_par::{create_ast, context::AstContext};
//! use coltc_util::Handler;
//!
//! let mut ctx = AstContext::new();
//! let handler = Handler::new();
//! let ast = create_ast("fn main() -> i64 { return 0; }", &mut ctx, &handler);
//! assert!(ast.is_ok());
//! ```

pub mod ast;
pub mod context;
pub mod expr;
pub mod items;
pub mod operators;
pub mod stmt;
pub mod types;

pub use ast::{Ast, Expr, ExprKind};
pub use context::{AstContext, ExprId, StrId, TypeId};
pub use operators::{BinaryOp, UnaryOp};
pub use types::{BuiltinId, Type, TypeKind};

use coltc_lex::{Lexer, LineInfo, Token};
use coltc_util::{ByteRange, Handler, SourceSpan, Symbol};
use indexmap::IndexMap;
use thiserror::Error;

/// Span of a single captured lexeme.
pub(crate) fn span_of(info: LineInfo) -> SourceSpan {
    SourceSpan::single_line(info.line_nb, info.line, info.lexeme)
}

/// Failure of [`create_ast`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AstError {
    /// The source contained no top-level expression.
    #[error("the program contains no top-level declaration")]
    EmptyProgram,
    /// Diagnostics were reported while parsing.
    #[error("parsing failed with {0} error(s)")]
    Errors(u32),
}

impl AstError {
    /// The number of errors reported while parsing.
    pub fn error_count(&self) -> u32 {
        match self {
            AstError::EmptyProgram => 0,
            AstError::Errors(n) => *n,
        }
    }
}

/// Parse a full source buffer into an [`Ast`].
///
/// All nodes are created inside `ctx`; diagnostics are reported through
/// `handler`. Returns the AST when the source parsed without errors, the
/// error count otherwise. An empty program is an error.
pub fn create_ast(source: &str, ctx: &mut AstContext, handler: &Handler) -> Result<Ast, AstError> {
    let errors_before = handler.error_count();
    let exprs = {
        let mut parser = Parser::new(source, ctx, handler);
        parser.run()
    };
    let errors = handler.error_count() - errors_before;

    if errors != 0 {
        Err(AstError::Errors(errors))
    } else if exprs.is_empty() {
        Err(AstError::EmptyProgram)
    } else {
        Ok(Ast { exprs })
    }
}

/// The recursive-descent parser.
///
/// Owns the lexer and the symbol tables; every node it builds lands in
/// the borrowed [`AstContext`].
pub struct Parser<'a> {
    /// Token source.
    lexer: Lexer<'a>,

    /// Diagnostic sink shared with the lexer.
    handler: &'a Handler,

    /// Node and type storage.
    ctx: &'a mut AstContext,

    /// The current token.
    current: Token,

    /// Line/lexeme info of the current token.
    current_info: LineInfo,

    /// Line/lexeme info of the last consumed token.
    last_info: LineInfo,

    /// Stack of local variables of the enclosing function, innermost
    /// scope on top.
    locals: Vec<(Symbol, TypeId)>,

    /// Global symbol table; later inserts replace earlier ones.
    globals: IndexMap<Symbol, ExprId>,

    /// Declaration of the function whose body is being parsed.
    current_fn: Option<ExprId>,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source`, building nodes into `ctx`.
    pub fn new(source: &'a str, ctx: &'a mut AstContext, handler: &'a Handler) -> Self {
        let mut lexer = Lexer::new(source, handler);
        let current = lexer.next_token();
        let current_info = lexer.line_info();
        Self {
            lexer,
            handler,
            ctx,
            current,
            current_info,
            last_info: current_info,
            locals: Vec::new(),
            globals: IndexMap::new(),
            current_fn: None,
        }
    }

    /// Parse the whole source, returning the top-level expressions.
    pub fn run(&mut self) -> Vec<ExprId> {
        let mut exprs = Vec::new();
        while self.current != Token::Eof {
            let before = self.current_info.lexeme.start;
            exprs.push(self.parse_global_declaration());
            // stray closing tokens stop both panic modes; force progress
            if self.current != Token::Eof && self.current_info.lexeme.start == before {
                self.consume_current();
            }
        }
        exprs
    }

    // =========================================================================
    // TOKEN PLUMBING
    // =========================================================================

    /// Advance to the next token.
    pub(crate) fn consume_current(&mut self) {
        self.last_info = self.current_info;
        self.current = self.lexer.next_token();
        self.current_info = self.lexer.line_info();
    }

    /// Validate that the current token is `expected` and consume it;
    /// otherwise report `msg` over the current lexeme and resynchronise.
    /// Returns true if the token matched.
    pub(crate) fn expect(&mut self, expected: Token, msg: &str) -> bool {
        if self.current == expected {
            self.consume_current();
            true
        } else {
            self.error_lexeme(msg.to_string());
            false
        }
    }

    // =========================================================================
    // SPANS
    // =========================================================================

    /// Capture the start of a construct (the current lexeme).
    pub(crate) fn span_start(&self) -> LineInfo {
        self.current_info
    }

    /// Span from a captured start through the last consumed lexeme.
    pub(crate) fn span_from(&self, start: LineInfo) -> SourceSpan {
        let line_end = self.last_info.line_nb.max(start.line_nb);
        let lines = ByteRange::new(start.line.start, self.last_info.line.end.max(start.line.end));
        let expr_end = self.last_info.lexeme.end.max(start.lexeme.start);
        SourceSpan::new(
            start.line_nb,
            line_end,
            lines,
            ByteRange::new(start.lexeme.start, expr_end),
        )
    }

    /// Span of the current lexeme alone.
    pub(crate) fn current_lexeme_span(&self) -> SourceSpan {
        SourceSpan::single_line(
            self.current_info.line_nb,
            self.current_info.line,
            self.current_info.lexeme,
        )
    }

    // =========================================================================
    // ERROR HANDLING
    // =========================================================================

    /// Report an error over the current lexeme and resynchronise at
    /// statement level.
    pub(crate) fn error_lexeme(&mut self, msg: String) {
        let span = self.current_lexeme_span();
        self.handler.error(msg, span);
        self.panic_consume();
    }

    /// Report an error over a whole construct (from `start` through the
    /// current lexeme) and resynchronise at statement level.
    pub(crate) fn error_construct(&mut self, start: LineInfo, msg: String) {
        let line_end = self.current_info.line_nb.max(start.line_nb);
        let lines = ByteRange::new(
            start.line.start,
            self.current_info.line.end.max(start.line.end),
        );
        let expr_end = self.current_info.lexeme.end.max(start.lexeme.start);
        let span = SourceSpan::new(
            start.line_nb,
            line_end,
            lines,
            ByteRange::new(start.lexeme.start, expr_end),
        );
        self.handler.error(msg, span);
        self.panic_consume();
    }

    /// Report an error over a construct and substitute an error node.
    pub(crate) fn error_expr(&mut self, start: LineInfo, msg: String) -> ExprId {
        self.error_construct(start, msg);
        self.error_node()
    }

    /// Build a bare error node.
    pub(crate) fn error_node(&mut self) -> ExprId {
        let ty = self.ctx.error_type();
        self.ctx.push_expr(Expr::new(ExprKind::Error, ty, SourceSpan::NONE))
    }

    /// Statement-level panic: consume tokens until the next `;`, `}`, `)`
    /// or EOF, then a trailing `;`.
    pub(crate) fn panic_consume(&mut self) {
        while !matches!(
            self.current,
            Token::Eof | Token::Semicolon | Token::RightCurly | Token::RightParen
        ) {
            self.consume_current();
        }
        if self.current == Token::Semicolon {
            self.consume_current();
        }
    }

    /// Paren-level panic: consume tokens until the next `)`, `;` or EOF,
    /// then a trailing `;`.
    pub(crate) fn panic_consume_rparen(&mut self) {
        while !matches!(self.current, Token::RightParen | Token::Eof | Token::Semicolon) {
            self.consume_current();
        }
        if self.current == Token::Semicolon {
            self.consume_current();
        }
    }

    // =========================================================================
    // SCOPES
    // =========================================================================

    /// Run `f` with a fresh local-variable scope; the stack depth is
    /// restored on every exit path, including error recovery.
    pub(crate) fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.locals.len();
        let result = f(self);
        self.locals.truncate(depth);
        result
    }
}
