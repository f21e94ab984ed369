//! AST node definitions.
//!
//! Every node is an [`Expr`] carrying its result type and source span,
//! owned by the [`AstContext`](crate::context::AstContext) and referenced
//! by [`ExprId`]. Nodes are immutable after creation except the `body`
//! slot of [`ExprKind::FnDef`], which is assigned once after the
//! definition has been registered so recursive calls resolve.

use coltc_util::{Qword, SourceSpan, Symbol};

use crate::context::{ExprId, TypeId};
use crate::operators::{BinaryOp, UnaryOp};

/// An expression of the Colt language.
#[derive(Clone, Debug)]
pub struct Expr {
    /// The shape of the expression.
    pub kind: ExprKind,
    /// The result type of the expression.
    pub ty: TypeId,
    /// Source location of the expression.
    pub span: SourceSpan,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, ty: TypeId, span: SourceSpan) -> Self {
        Self { kind, ty, span }
    }

    /// Check if the expression is the error sentinel.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }
}

/// The shape of an expression.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// A literal value; the node type tells how to read the payload.
    Literal {
        /// The decoded literal payload.
        value: Qword,
    },

    /// A unary operation.
    Unary {
        /// The operator (pre/post increments are distinct variants).
        op: UnaryOp,
        /// The expression operated on.
        child: ExprId,
    },

    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left-hand side.
        lhs: ExprId,
        /// Right-hand side.
        rhs: ExprId,
    },

    /// Explicit conversion of `child` to the node's type.
    Convert {
        /// The expression being converted.
        child: ExprId,
    },

    /// A variable declaration; the node type is the variable's type.
    VarDecl {
        /// Name of the variable.
        name: Symbol,
        /// Optional initialiser.
        init: Option<ExprId>,
        /// True for globals.
        global: bool,
    },

    /// Read of a variable.
    VarRead {
        /// Name of the variable.
        name: Symbol,
        /// Index into the local-variable table; `None` for parameters and
        /// globals.
        local_id: Option<usize>,
    },

    /// Write to a variable.
    VarWrite {
        /// Name of the variable.
        name: Symbol,
        /// The value written.
        value: ExprId,
        /// Index into the local-variable table; `None` for parameters and
        /// globals.
        local_id: Option<usize>,
    },

    /// A function declaration; the node type is the function type.
    FnDecl {
        /// Name of the function.
        name: Symbol,
        /// Ordered parameter names.
        params: Vec<Symbol>,
    },

    /// A function definition.
    FnDef {
        /// The declaration of the function.
        decl: ExprId,
        /// The body; `None` for declaration-only (extern) functions.
        body: Option<ExprId>,
    },

    /// A function call; the node type is the callee's return type.
    FnCall {
        /// The called function's declaration.
        decl: ExprId,
        /// The arguments, in source order.
        args: Vec<ExprId>,
    },

    /// A `return` statement.
    FnReturn {
        /// The returned value; `None` for `return;`.
        value: Option<ExprId>,
    },

    /// A scope; statements run in source order.
    Scope {
        /// The statements of the scope.
        body: Vec<ExprId>,
    },

    /// A conditional.
    Condition {
        /// The condition expression.
        cond: ExprId,
        /// Branch taken when the condition holds.
        then: ExprId,
        /// Optional else branch (`elif` chains nest here).
        otherwise: Option<ExprId>,
    },

    /// Sentinel produced after a diagnostic.
    Error,
}

/// The result of parsing a program: the top-level expressions, in source
/// order. All nodes live in the [`AstContext`](crate::context::AstContext)
/// the program was parsed into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ast {
    /// Top-level function definitions and global variable declarations.
    pub exprs: Vec<ExprId>,
}
