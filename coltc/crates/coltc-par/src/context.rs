//! The context owning every type and expression of a compilation.
//!
//! Storing unique types lets the rest of the compiler deal in [`TypeId`]s
//! only: structurally equal types intern to the same id, so type equality
//! is id equality. Expressions are owned but not deduplicated; the ids of
//! both stay valid for the lifetime of the context.

use coltc_util::{define_idx, IndexVec};
use rustc_hash::FxHashMap;

use crate::ast::{Ast, Expr, ExprKind};
use crate::types::{BuiltinId, Type};

define_idx!(
    /// Stable reference to an interned [`Type`].
    TypeId
);
define_idx!(
    /// Stable reference to an owned [`Expr`].
    ExprId
);
define_idx!(
    /// Stable reference to a string owned by the context.
    StrId
);

/// Owner of every `Type`, `Expr` and saved string of a compilation.
///
/// # Examples
///
/// ```
/// use coltc_par::context::AstContext;
/// use coltc_par::types::{BuiltinId, Type};
///
/// let mut ctx = AstContext::new();
/// let a = ctx.intern_type(Type::builtin(BuiltinId::I64, false));
/// let b = ctx.intern_type(Type::builtin(BuiltinId::I64, false));
/// assert_eq!(a, b);
/// ```
pub struct AstContext {
    /// All interned types.
    types: IndexVec<TypeId, Type>,
    /// Structural interning map over `types`.
    interned: FxHashMap<Type, TypeId>,
    /// All owned expressions.
    exprs: IndexVec<ExprId, Expr>,
    /// Strings owned on behalf of the driver (synthesised sources).
    strings: IndexVec<StrId, Box<str>>,
    /// Pre-interned `void`.
    void_ty: TypeId,
    /// Pre-interned error sentinel.
    error_ty: TypeId,
}

impl AstContext {
    /// Create an empty context with the well-known types pre-interned.
    pub fn new() -> Self {
        let mut types = IndexVec::new();
        let mut interned = FxHashMap::default();

        let void_ty = types.push(Type::void());
        interned.insert(Type::void(), void_ty);
        let error_ty = types.push(Type::error());
        interned.insert(Type::error(), error_ty);

        Self {
            types,
            interned,
            exprs: IndexVec::new(),
            strings: IndexVec::new(),
            void_ty,
            error_ty,
        }
    }

    // =========================================================================
    // TYPES
    // =========================================================================

    /// Intern a type, returning its stable id. Structurally equal types
    /// share one id.
    pub fn intern_type(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    /// Look up an interned type.
    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id]
    }

    /// The `void` type.
    #[inline]
    pub fn void_type(&self) -> TypeId {
        self.void_ty
    }

    /// The error sentinel type.
    #[inline]
    pub fn error_type(&self) -> TypeId {
        self.error_ty
    }

    /// Intern a built-in type.
    pub fn builtin_type(&mut self, id: BuiltinId, mutable: bool) -> TypeId {
        self.intern_type(Type::builtin(id, mutable))
    }

    /// Intern a pointer type.
    pub fn ptr_type(&mut self, mutable: bool, pointee: TypeId) -> TypeId {
        self.intern_type(Type::ptr(mutable, pointee))
    }

    /// Intern a function type.
    pub fn fn_type(&mut self, ret: TypeId, params: Vec<TypeId>, variadic: bool) -> TypeId {
        self.intern_type(Type::function(ret, params, variadic))
    }

    /// Check if two types are the same modulo top-level mutability.
    pub fn same_type_modulo_mut(&self, a: TypeId, b: TypeId) -> bool {
        a == b || self.ty(a).kind == self.ty(b).kind
    }

    /// Human-readable name of a type, for diagnostics.
    pub fn type_name(&self, id: TypeId) -> String {
        let ty = self.ty(id);
        let mut name = String::new();
        if ty.mutable {
            name.push_str("mut ");
        }
        match &ty.kind {
            crate::types::TypeKind::Void => name.push_str("void"),
            crate::types::TypeKind::Error => name.push_str("<error>"),
            crate::types::TypeKind::BuiltIn(b) => name.push_str(b.name()),
            crate::types::TypeKind::Ptr(to) => {
                name.push_str("PTR<");
                name.push_str(&self.type_name(*to));
                name.push('>');
            }
            crate::types::TypeKind::Fn(sig) => {
                name.push_str("fn(");
                for (i, p) in sig.params.iter().enumerate() {
                    if i != 0 {
                        name.push_str(", ");
                    }
                    name.push_str(&self.type_name(*p));
                }
                name.push_str(") -> ");
                name.push_str(&self.type_name(sig.ret));
            }
        }
        name
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Take ownership of an expression, returning its stable id.
    pub fn push_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr)
    }

    /// Look up an owned expression.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    /// Number of expressions owned by the context.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Assign the body of a function definition.
    ///
    /// The slot is written exactly once, after the definition has been
    /// registered in the global table so the body can call the function
    /// recursively.
    ///
    /// # Panics
    ///
    /// Panics if `def` is not a bodyless `FnDef`.
    pub fn set_fn_body(&mut self, def: ExprId, body: ExprId) {
        match &mut self.exprs[def].kind {
            ExprKind::FnDef { body: slot @ None, .. } => *slot = Some(body),
            _ => unreachable!("set_fn_body target must be a bodyless function definition"),
        }
    }

    // =========================================================================
    // STRINGS
    // =========================================================================

    /// Take ownership of a string for the context's lifetime.
    ///
    /// Useful when the driver synthesises source, e.g. a REPL wrapping an
    /// expression in a synthetic `main`.
    pub fn own_string(&mut self, string: impl Into<String>) -> StrId {
        self.strings.push(string.into().into_boxed_str())
    }

    /// Look up an owned string.
    #[inline]
    pub fn string(&self, id: StrId) -> &str {
        &self.strings[id]
    }

    /// Convenience for walking an [`Ast`]: the type of a node.
    #[inline]
    pub fn expr_type(&self, id: ExprId) -> TypeId {
        self.exprs[id].ty
    }

    /// Convenience for tests and drivers: iterate top-level nodes.
    pub fn top_level<'a>(&'a self, ast: &'a Ast) -> impl Iterator<Item = &'a Expr> + 'a {
        ast.exprs.iter().map(move |id| self.expr(*id))
    }
}

impl Default for AstContext {
    fn default() -> Self {
        Self::new()
    }
}
