//! The type model of the Colt language.
//!
//! Types are interned inside the [`AstContext`](crate::context::AstContext)
//! so that structural equality reduces to [`TypeId`] equality. Built-in
//! types carry an operator-support view telling the parser which binary
//! operators they accept.

use crate::context::TypeId;
use crate::operators::BinaryOp;

/// Identifier of a built-in type.
///
/// The 128-bit and `lstring` ids exist in the type model but have no
/// literal suffixes or typename keywords of their own; `lstring` is a
/// scalar for typing purposes only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BuiltinId {
    /// Boolean, unsigned 1-bit integer.
    Bool,
    /// 8-bit ASCII char.
    Char,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Unsigned 128-bit integer.
    U128,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Signed 128-bit integer.
    I128,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// Pointer to constant characters.
    Lstring,
}

impl BuiltinId {
    /// Check if the id is any signed or unsigned built-in integer.
    #[inline]
    pub fn is_integer(self) -> bool {
        self.is_unsigned_int() || self.is_signed_int()
    }

    /// Check if the id is a signed built-in integer.
    #[inline]
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            BuiltinId::I8 | BuiltinId::I16 | BuiltinId::I32 | BuiltinId::I64 | BuiltinId::I128
        )
    }

    /// Check if the id is an unsigned built-in integer.
    #[inline]
    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            BuiltinId::U8 | BuiltinId::U16 | BuiltinId::U32 | BuiltinId::U64 | BuiltinId::U128
        )
    }

    /// Check if the id is `f32` or `f64`.
    #[inline]
    pub fn is_floating(self) -> bool {
        matches!(self, BuiltinId::F32 | BuiltinId::F64)
    }

    /// Width of the type in bits, or `None` for `lstring`.
    pub fn bit_width(self) -> Option<u32> {
        let width = match self {
            BuiltinId::Bool => 1,
            BuiltinId::Char | BuiltinId::U8 | BuiltinId::I8 => 8,
            BuiltinId::U16 | BuiltinId::I16 => 16,
            BuiltinId::U32 | BuiltinId::I32 | BuiltinId::F32 => 32,
            BuiltinId::U64 | BuiltinId::I64 | BuiltinId::F64 => 64,
            BuiltinId::U128 | BuiltinId::I128 => 128,
            BuiltinId::Lstring => return None,
        };
        Some(width)
    }

    /// The source-level name of the type.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinId::Bool => "bool",
            BuiltinId::Char => "char",
            BuiltinId::U8 => "u8",
            BuiltinId::U16 => "u16",
            BuiltinId::U32 => "u32",
            BuiltinId::U64 => "u64",
            BuiltinId::U128 => "u128",
            BuiltinId::I8 => "i8",
            BuiltinId::I16 => "i16",
            BuiltinId::I32 => "i32",
            BuiltinId::I64 => "i64",
            BuiltinId::I128 => "i128",
            BuiltinId::F32 => "f32",
            BuiltinId::F64 => "f64",
            BuiltinId::Lstring => "lstring",
        }
    }
}

/// Binary operators supported by integral built-in types.
pub const INTEGRAL_SUPPORTED: [BinaryOp; 16] = [
    BinaryOp::Sum,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Eq,
    BinaryOp::NotEq,
    BinaryOp::Great,
    BinaryOp::GreatEq,
    BinaryOp::Less,
    BinaryOp::LessEq,
    BinaryOp::BitAnd,
    BinaryOp::BitOr,
    BinaryOp::BitXor,
    BinaryOp::Shl,
    BinaryOp::Shr,
];

/// Binary operators supported by floating-point built-in types.
pub const FLOATING_SUPPORTED: [BinaryOp; 10] = [
    BinaryOp::Sum,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Eq,
    BinaryOp::NotEq,
    BinaryOp::Great,
    BinaryOp::GreatEq,
    BinaryOp::Less,
    BinaryOp::LessEq,
];

/// Binary operators supported by `bool`.
pub const BOOL_SUPPORTED: [BinaryOp; 4] = [
    BinaryOp::Eq,
    BinaryOp::NotEq,
    BinaryOp::BoolAnd,
    BinaryOp::BoolOr,
];

/// Binary operators supported by `char`.
pub const CHAR_SUPPORTED: [BinaryOp; 2] = [BinaryOp::Eq, BinaryOp::NotEq];

/// Binary operators supported by `lstring`.
pub const LSTRING_SUPPORTED: [BinaryOp; 2] = [BinaryOp::Eq, BinaryOp::NotEq];

/// The operator-support view of a built-in type.
pub fn supported_ops(id: BuiltinId) -> &'static [BinaryOp] {
    match id {
        BuiltinId::Bool => &BOOL_SUPPORTED,
        BuiltinId::Char => &CHAR_SUPPORTED,
        BuiltinId::Lstring => &LSTRING_SUPPORTED,
        BuiltinId::F32 | BuiltinId::F64 => &FLOATING_SUPPORTED,
        _ => &INTEGRAL_SUPPORTED,
    }
}

/// Check if a built-in type supports a binary operator.
pub fn supports(id: BuiltinId, op: BinaryOp) -> bool {
    supported_ops(id).contains(&op)
}

/// The signature of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnSig {
    /// Return type.
    pub ret: TypeId,
    /// Ordered parameter types.
    pub params: Vec<TypeId>,
    /// True if the function accepts C-style variadic arguments.
    pub variadic: bool,
}

/// The shape of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The `void` type.
    Void,
    /// Sentinel produced when parsing a type fails.
    Error,
    /// A built-in scalar type.
    BuiltIn(BuiltinId),
    /// Pointer to another type.
    Ptr(TypeId),
    /// A function type.
    Fn(FnSig),
}

/// A type of the Colt language.
///
/// `mutable` is meaningful only for built-in and pointer types; `void`,
/// the error sentinel and function types are never mutable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// The shape of the type.
    pub kind: TypeKind,
    /// True if values of this type can be written through.
    pub mutable: bool,
}

impl Type {
    /// The `void` type.
    pub fn void() -> Type {
        Type {
            kind: TypeKind::Void,
            mutable: false,
        }
    }

    /// The error sentinel type.
    pub fn error() -> Type {
        Type {
            kind: TypeKind::Error,
            mutable: false,
        }
    }

    /// A built-in type.
    pub fn builtin(id: BuiltinId, mutable: bool) -> Type {
        Type {
            kind: TypeKind::BuiltIn(id),
            mutable,
        }
    }

    /// A pointer type.
    pub fn ptr(mutable: bool, pointee: TypeId) -> Type {
        Type {
            kind: TypeKind::Ptr(pointee),
            mutable,
        }
    }

    /// A function type.
    pub fn function(ret: TypeId, params: Vec<TypeId>, variadic: bool) -> Type {
        Type {
            kind: TypeKind::Fn(FnSig {
                ret,
                params,
                variadic,
            }),
            mutable: false,
        }
    }

    /// Check if the type is `void`.
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    /// Check if the type is the error sentinel.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TypeKind::Error)
    }

    /// Check if the type is built-in.
    #[inline]
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, TypeKind::BuiltIn(_))
    }

    /// Check if the type is a pointer.
    #[inline]
    pub fn is_ptr(&self) -> bool {
        matches!(self.kind, TypeKind::Ptr(_))
    }

    /// Check if the type is a function.
    #[inline]
    pub fn is_fn(&self) -> bool {
        matches!(self.kind, TypeKind::Fn(_))
    }

    /// The built-in id, for built-in types.
    #[inline]
    pub fn builtin_id(&self) -> Option<BuiltinId> {
        match self.kind {
            TypeKind::BuiltIn(id) => Some(id),
            _ => None,
        }
    }

    /// Check if the type supports a binary operator. Only built-in types
    /// support operators.
    pub fn supports(&self, op: BinaryOp) -> bool {
        match self.builtin_id() {
            Some(id) => supports(id, op),
            None => false,
        }
    }

    /// The function signature, for function types.
    pub fn fn_sig(&self) -> Option<&FnSig> {
        match &self.kind {
            TypeKind::Fn(sig) => Some(sig),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(BuiltinId::U8.is_integer());
        assert!(BuiltinId::I128.is_integer());
        assert!(!BuiltinId::Bool.is_integer());
        assert!(!BuiltinId::Char.is_integer());
        assert!(!BuiltinId::F32.is_integer());
        assert!(!BuiltinId::Lstring.is_integer());

        assert!(BuiltinId::I8.is_signed_int());
        assert!(!BuiltinId::U128.is_signed_int());
        assert!(BuiltinId::U128.is_unsigned_int());
        assert!(!BuiltinId::Bool.is_unsigned_int());

        assert!(BuiltinId::F32.is_floating());
        assert!(BuiltinId::F64.is_floating());
        assert!(!BuiltinId::I64.is_floating());
    }

    #[test]
    fn test_bit_width() {
        assert_eq!(BuiltinId::Bool.bit_width(), Some(1));
        assert_eq!(BuiltinId::Char.bit_width(), Some(8));
        assert_eq!(BuiltinId::U16.bit_width(), Some(16));
        assert_eq!(BuiltinId::I64.bit_width(), Some(64));
        assert_eq!(BuiltinId::F32.bit_width(), Some(32));
        assert_eq!(BuiltinId::U128.bit_width(), Some(128));
        assert_eq!(BuiltinId::Lstring.bit_width(), None);
    }

    #[test]
    fn test_integral_support() {
        for op in [BinaryOp::Sum, BinaryOp::Mod, BinaryOp::Shl, BinaryOp::LessEq] {
            assert!(supports(BuiltinId::I32, op), "{}", op);
            assert!(supports(BuiltinId::U64, op), "{}", op);
        }
        assert!(!supports(BuiltinId::I32, BinaryOp::BoolAnd));
        assert!(!supports(BuiltinId::U8, BinaryOp::BoolOr));
    }

    #[test]
    fn test_floating_support() {
        assert!(supports(BuiltinId::F64, BinaryOp::Sum));
        assert!(supports(BuiltinId::F32, BinaryOp::Less));
        assert!(!supports(BuiltinId::F64, BinaryOp::Mod));
        assert!(!supports(BuiltinId::F32, BinaryOp::BitAnd));
        assert!(!supports(BuiltinId::F32, BinaryOp::Shl));
    }

    #[test]
    fn test_bool_char_lstring_support() {
        assert!(supports(BuiltinId::Bool, BinaryOp::BoolAnd));
        assert!(supports(BuiltinId::Bool, BinaryOp::Eq));
        assert!(!supports(BuiltinId::Bool, BinaryOp::Sum));

        assert!(supports(BuiltinId::Char, BinaryOp::Eq));
        assert!(!supports(BuiltinId::Char, BinaryOp::Less));

        assert!(supports(BuiltinId::Lstring, BinaryOp::NotEq));
        assert!(!supports(BuiltinId::Lstring, BinaryOp::Sum));
    }

    #[test]
    fn test_type_predicates() {
        assert!(Type::void().is_void());
        assert!(Type::error().is_error());
        let ty = Type::builtin(BuiltinId::I32, true);
        assert!(ty.is_builtin());
        assert!(ty.mutable);
        assert_eq!(ty.builtin_id(), Some(BuiltinId::I32));
        assert!(!Type::void().is_builtin());
    }

    #[test]
    fn test_type_supports() {
        assert!(Type::builtin(BuiltinId::Bool, false).supports(BinaryOp::BoolOr));
        assert!(!Type::void().supports(BinaryOp::Eq));
        assert!(!Type::error().supports(BinaryOp::Sum));
    }
}
