//! coltc-eval - Constant folding over [`Qword`] values.
//!
//! Every operation takes its operands as tagged 64-bit values plus the
//! built-in type id selecting the semantics, and returns the result
//! together with an [`OpError`] describing what went wrong. Integer
//! arithmetic is checked: when the mathematical result does not fit the
//! target width, the wrapped value is returned along with the appropriate
//! overflow or underflow flag. Float operations check NaN on inputs (a NaN
//! input short-circuits and is returned with [`OpError::WasNan`]) and on
//! the produced value ([`OpError::RetNan`]).
//!
//! The callers guarantee the type id is valid for the operation (the
//! parser only builds operations the operand type supports); passing e.g.
//! a float id to `bit_and` is a programmer error and panics.

use coltc_par::{BinaryOp, BuiltinId};
use coltc_util::Qword;

/// Failure mode of a folded operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpError {
    /// No error.
    None,
    /// Integer division or modulo by zero.
    DivByZero,
    /// Shift amount not below the width in bits of the value's type.
    ShiftGeWidth,
    /// Unsigned overflow.
    UnsignedOverflow,
    /// Unsigned underflow.
    UnsignedUnderflow,
    /// Signed overflow.
    SignedOverflow,
    /// Signed underflow.
    SignedUnderflow,
    /// A floating-point input was NaN.
    WasNan,
    /// The floating-point result is NaN.
    RetNan,
}

impl OpError {
    /// Human-readable explanation of the error.
    pub fn explain(self) -> &'static str {
        match self {
            OpError::None => "No errors detected!",
            OpError::DivByZero => "Integral division by zero!",
            OpError::ShiftGeWidth => "Shift by value greater than bits size!",
            OpError::UnsignedOverflow => "Unsigned overflow detected!",
            OpError::UnsignedUnderflow => "Unsigned underflow detected!",
            OpError::SignedOverflow => "Signed overflow detected!",
            OpError::SignedUnderflow => "Signed underflow detected!",
            OpError::WasNan | OpError::RetNan => {
                "Floating point operation evaluates to NaN!"
            }
        }
    }
}

/// The result of any operation.
pub type OpResult = (Qword, OpError);

/// A binary operation of the engine.
pub type BinOpFn = fn(Qword, Qword, BuiltinId) -> OpResult;

// Checked unsigned arithmetic: the wrapped value plus the flag.
macro_rules! unsigned_arith {
    ($a:expr, $b:expr, $as:ident, $method:ident, $flag:ident) => {{
        let (value, overflow) = $a.$as().$method($b.$as());
        let err = if overflow { OpError::$flag } else { OpError::None };
        (Qword::from(value), err)
    }};
}

// Checked signed addition; the sign of the addend picks the flag.
macro_rules! signed_add {
    ($a:expr, $b:expr, $as:ident) => {{
        let y = $b.$as();
        let (value, overflow) = $a.$as().overflowing_add(y);
        let err = if !overflow {
            OpError::None
        } else if y >= 0 {
            OpError::SignedOverflow
        } else {
            OpError::SignedUnderflow
        };
        (Qword::from(value), err)
    }};
}

// Checked signed subtraction; subtracting a negative overflows upward.
macro_rules! signed_sub {
    ($a:expr, $b:expr, $as:ident) => {{
        let y = $b.$as();
        let (value, overflow) = $a.$as().overflowing_sub(y);
        let err = if !overflow {
            OpError::None
        } else if y <= 0 {
            OpError::SignedOverflow
        } else {
            OpError::SignedUnderflow
        };
        (Qword::from(value), err)
    }};
}

// Checked signed multiplication; the sign of the true product picks the
// flag.
macro_rules! signed_mul {
    ($a:expr, $b:expr, $as:ident) => {{
        let x = $a.$as();
        let y = $b.$as();
        let (value, overflow) = x.overflowing_mul(y);
        let err = if !overflow {
            OpError::None
        } else if (x < 0) != (y < 0) {
            OpError::SignedUnderflow
        } else {
            OpError::SignedOverflow
        };
        (Qword::from(value), err)
    }};
}

macro_rules! unsigned_div {
    ($a:expr, $b:expr, $as:ident, $op:tt) => {{
        let y = $b.$as();
        if y == 0 {
            (Qword::ZERO, OpError::DivByZero)
        } else {
            (Qword::from($a.$as() $op y), OpError::None)
        }
    }};
}

macro_rules! signed_div {
    ($a:expr, $b:expr, $as:ident) => {{
        let y = $b.$as();
        if y == 0 {
            (Qword::ZERO, OpError::DivByZero)
        } else {
            let (value, overflow) = $a.$as().overflowing_div(y);
            let err = if overflow {
                OpError::SignedOverflow
            } else {
                OpError::None
            };
            (Qword::from(value), err)
        }
    }};
}

macro_rules! signed_mod {
    ($a:expr, $b:expr, $as:ident) => {{
        let y = $b.$as();
        if y == 0 {
            (Qword::ZERO, OpError::DivByZero)
        } else {
            (Qword::from($a.$as().wrapping_rem(y)), OpError::None)
        }
    }};
}

// Float arithmetic with NaN checks on inputs and output.
macro_rules! float_arith {
    ($a:expr, $b:expr, $as:ident, $op:tt) => {{
        let x = $a.$as();
        let y = $b.$as();
        if x.is_nan() {
            ($a, OpError::WasNan)
        } else if y.is_nan() {
            ($b, OpError::WasNan)
        } else {
            let value = x $op y;
            let err = if value.is_nan() { OpError::RetNan } else { OpError::None };
            (Qword::from(value), err)
        }
    }};
}

// Float comparison; non-NaN inputs cannot produce NaN.
macro_rules! float_cmp {
    ($a:expr, $b:expr, $as:ident, $op:tt) => {{
        let x = $a.$as();
        let y = $b.$as();
        if x.is_nan() {
            ($a, OpError::WasNan)
        } else if y.is_nan() {
            ($b, OpError::WasNan)
        } else {
            (Qword::from(x $op y), OpError::None)
        }
    }};
}

macro_rules! int_cmp {
    ($a:expr, $b:expr, $as:ident, $op:tt) => {
        (Qword::from($a.$as() $op $b.$as()), OpError::None)
    };
}

/// `a + b`.
pub fn add(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::U8 => unsigned_arith!(a, b, as_u8, overflowing_add, UnsignedOverflow),
        BuiltinId::U16 => unsigned_arith!(a, b, as_u16, overflowing_add, UnsignedOverflow),
        BuiltinId::U32 => unsigned_arith!(a, b, as_u32, overflowing_add, UnsignedOverflow),
        BuiltinId::U64 => unsigned_arith!(a, b, as_u64, overflowing_add, UnsignedOverflow),
        BuiltinId::I8 => signed_add!(a, b, as_i8),
        BuiltinId::I16 => signed_add!(a, b, as_i16),
        BuiltinId::I32 => signed_add!(a, b, as_i32),
        BuiltinId::I64 => signed_add!(a, b, as_i64),
        BuiltinId::F32 => float_arith!(a, b, as_f32, +),
        BuiltinId::F64 => float_arith!(a, b, as_f64, +),
        _ => unreachable!("invalid type for 'add'"),
    }
}

/// `a - b`.
pub fn sub(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::U8 => unsigned_arith!(a, b, as_u8, overflowing_sub, UnsignedUnderflow),
        BuiltinId::U16 => unsigned_arith!(a, b, as_u16, overflowing_sub, UnsignedUnderflow),
        BuiltinId::U32 => unsigned_arith!(a, b, as_u32, overflowing_sub, UnsignedUnderflow),
        BuiltinId::U64 => unsigned_arith!(a, b, as_u64, overflowing_sub, UnsignedUnderflow),
        BuiltinId::I8 => signed_sub!(a, b, as_i8),
        BuiltinId::I16 => signed_sub!(a, b, as_i16),
        BuiltinId::I32 => signed_sub!(a, b, as_i32),
        BuiltinId::I64 => signed_sub!(a, b, as_i64),
        BuiltinId::F32 => float_arith!(a, b, as_f32, -),
        BuiltinId::F64 => float_arith!(a, b, as_f64, -),
        _ => unreachable!("invalid type for 'sub'"),
    }
}

/// `a * b`.
pub fn mul(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::U8 => unsigned_arith!(a, b, as_u8, overflowing_mul, UnsignedOverflow),
        BuiltinId::U16 => unsigned_arith!(a, b, as_u16, overflowing_mul, UnsignedOverflow),
        BuiltinId::U32 => unsigned_arith!(a, b, as_u32, overflowing_mul, UnsignedOverflow),
        BuiltinId::U64 => unsigned_arith!(a, b, as_u64, overflowing_mul, UnsignedOverflow),
        BuiltinId::I8 => signed_mul!(a, b, as_i8),
        BuiltinId::I16 => signed_mul!(a, b, as_i16),
        BuiltinId::I32 => signed_mul!(a, b, as_i32),
        BuiltinId::I64 => signed_mul!(a, b, as_i64),
        BuiltinId::F32 => float_arith!(a, b, as_f32, *),
        BuiltinId::F64 => float_arith!(a, b, as_f64, *),
        _ => unreachable!("invalid type for 'mul'"),
    }
}

/// `a / b`.
pub fn div(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::U8 => unsigned_div!(a, b, as_u8, /),
        BuiltinId::U16 => unsigned_div!(a, b, as_u16, /),
        BuiltinId::U32 => unsigned_div!(a, b, as_u32, /),
        BuiltinId::U64 => unsigned_div!(a, b, as_u64, /),
        BuiltinId::I8 => signed_div!(a, b, as_i8),
        BuiltinId::I16 => signed_div!(a, b, as_i16),
        BuiltinId::I32 => signed_div!(a, b, as_i32),
        BuiltinId::I64 => signed_div!(a, b, as_i64),
        BuiltinId::F32 => float_arith!(a, b, as_f32, /),
        BuiltinId::F64 => float_arith!(a, b, as_f64, /),
        _ => unreachable!("invalid type for 'div'"),
    }
}

/// `a % b`; integers only.
pub fn modulo(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::U8 => unsigned_div!(a, b, as_u8, %),
        BuiltinId::U16 => unsigned_div!(a, b, as_u16, %),
        BuiltinId::U32 => unsigned_div!(a, b, as_u32, %),
        BuiltinId::U64 => unsigned_div!(a, b, as_u64, %),
        BuiltinId::I8 => signed_mod!(a, b, as_i8),
        BuiltinId::I16 => signed_mod!(a, b, as_i16),
        BuiltinId::I32 => signed_mod!(a, b, as_i32),
        BuiltinId::I64 => signed_mod!(a, b, as_i64),
        _ => unreachable!("invalid type for 'mod'"),
    }
}

fn width_of(id: BuiltinId) -> u32 {
    debug_assert!(
        id.is_integer() || matches!(id, BuiltinId::Bool | BuiltinId::Char),
        "expected an integer"
    );
    id.bit_width().unwrap_or(64).min(64)
}

/// `a & b`.
pub fn bit_and(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let _ = width_of(id);
    (Qword::from_bits(a.bits() & b.bits()), OpError::None)
}

/// `a | b`.
pub fn bit_or(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let _ = width_of(id);
    (Qword::from_bits(a.bits() | b.bits()), OpError::None)
}

/// `a ^ b`.
pub fn bit_xor(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let _ = width_of(id);
    (Qword::from_bits(a.bits() ^ b.bits()), OpError::None)
}

/// `~a`, masked to the width of the type.
pub fn bit_not(a: Qword, id: BuiltinId) -> OpResult {
    let width = width_of(id);
    let mask = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    (Qword::from_bits(!a.bits() & mask), OpError::None)
}

/// `a << b`; flags shifts that are not below the type's width in bits.
pub fn shl(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let width = width_of(id);
    let by = b.as_u64();
    if by >= width as u64 {
        return (Qword::ZERO, OpError::ShiftGeWidth);
    }
    (Qword::from_bits(a.bits() << by), OpError::None)
}

/// `a >> b`; flags shifts that are not below the type's width in bits.
pub fn shr(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let width = width_of(id);
    let by = b.as_u64();
    if by >= width as u64 {
        return (Qword::ZERO, OpError::ShiftGeWidth);
    }
    (Qword::from_bits(a.bits() >> by), OpError::None)
}

/// `a && b`; booleans only.
pub fn bool_and(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    debug_assert_eq!(id, BuiltinId::Bool, "expected a bool type");
    (Qword::from(a.as_bool() && b.as_bool()), OpError::None)
}

/// `a || b`; booleans only.
pub fn bool_or(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    debug_assert_eq!(id, BuiltinId::Bool, "expected a bool type");
    (Qword::from(a.as_bool() || b.as_bool()), OpError::None)
}

/// `a == b`; every built-in the engine covers.
pub fn eq(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::Bool
        | BuiltinId::Char
        | BuiltinId::Lstring
        | BuiltinId::U8
        | BuiltinId::U16
        | BuiltinId::U32
        | BuiltinId::U64
        | BuiltinId::I8
        | BuiltinId::I16
        | BuiltinId::I32
        | BuiltinId::I64 => (Qword::from(a.bits() == b.bits()), OpError::None),
        BuiltinId::F32 => float_cmp!(a, b, as_f32, ==),
        BuiltinId::F64 => float_cmp!(a, b, as_f64, ==),
        _ => unreachable!("invalid type for 'eq'"),
    }
}

/// `a != b`.
pub fn neq(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    let (value, err) = eq(a, b, id);
    if err != OpError::None {
        return (value, err);
    }
    (Qword::from(!value.as_bool()), OpError::None)
}

/// `a < b`; numeric types and `char`.
pub fn le(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::Char | BuiltinId::U8 | BuiltinId::U16 | BuiltinId::U32 | BuiltinId::U64 => {
            int_cmp!(a, b, as_u64, <)
        }
        BuiltinId::I8 => int_cmp!(a, b, as_i8, <),
        BuiltinId::I16 => int_cmp!(a, b, as_i16, <),
        BuiltinId::I32 => int_cmp!(a, b, as_i32, <),
        BuiltinId::I64 => int_cmp!(a, b, as_i64, <),
        BuiltinId::F32 => float_cmp!(a, b, as_f32, <),
        BuiltinId::F64 => float_cmp!(a, b, as_f64, <),
        _ => unreachable!("invalid type for 'le'"),
    }
}

/// `a <= b`; numeric types and `char`.
pub fn leq(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::Char | BuiltinId::U8 | BuiltinId::U16 | BuiltinId::U32 | BuiltinId::U64 => {
            int_cmp!(a, b, as_u64, <=)
        }
        BuiltinId::I8 => int_cmp!(a, b, as_i8, <=),
        BuiltinId::I16 => int_cmp!(a, b, as_i16, <=),
        BuiltinId::I32 => int_cmp!(a, b, as_i32, <=),
        BuiltinId::I64 => int_cmp!(a, b, as_i64, <=),
        BuiltinId::F32 => float_cmp!(a, b, as_f32, <=),
        BuiltinId::F64 => float_cmp!(a, b, as_f64, <=),
        _ => unreachable!("invalid type for 'leq'"),
    }
}

/// `a > b`; numeric types and `char`.
pub fn ge(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::Char | BuiltinId::U8 | BuiltinId::U16 | BuiltinId::U32 | BuiltinId::U64 => {
            int_cmp!(a, b, as_u64, >)
        }
        BuiltinId::I8 => int_cmp!(a, b, as_i8, >),
        BuiltinId::I16 => int_cmp!(a, b, as_i16, >),
        BuiltinId::I32 => int_cmp!(a, b, as_i32, >),
        BuiltinId::I64 => int_cmp!(a, b, as_i64, >),
        BuiltinId::F32 => float_cmp!(a, b, as_f32, >),
        BuiltinId::F64 => float_cmp!(a, b, as_f64, >),
        _ => unreachable!("invalid type for 'ge'"),
    }
}

/// `a >= b`; numeric types and `char`.
pub fn geq(a: Qword, b: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::Char | BuiltinId::U8 | BuiltinId::U16 | BuiltinId::U32 | BuiltinId::U64 => {
            int_cmp!(a, b, as_u64, >=)
        }
        BuiltinId::I8 => int_cmp!(a, b, as_i8, >=),
        BuiltinId::I16 => int_cmp!(a, b, as_i16, >=),
        BuiltinId::I32 => int_cmp!(a, b, as_i32, >=),
        BuiltinId::I64 => int_cmp!(a, b, as_i64, >=),
        BuiltinId::F32 => float_cmp!(a, b, as_f32, >=),
        BuiltinId::F64 => float_cmp!(a, b, as_f64, >=),
        _ => unreachable!("invalid type for 'geq'"),
    }
}

/// `-a`; signed integers and floats.
pub fn neg(a: Qword, id: BuiltinId) -> OpResult {
    match id {
        BuiltinId::I8 => (Qword::from(a.as_i8().wrapping_neg()), OpError::None),
        BuiltinId::I16 => (Qword::from(a.as_i16().wrapping_neg()), OpError::None),
        BuiltinId::I32 => (Qword::from(a.as_i32().wrapping_neg()), OpError::None),
        BuiltinId::I64 => (Qword::from(a.as_i64().wrapping_neg()), OpError::None),
        BuiltinId::F32 => {
            let x = a.as_f32();
            if x.is_nan() {
                return (a, OpError::WasNan);
            }
            (Qword::from(-x), OpError::None)
        }
        BuiltinId::F64 => {
            let x = a.as_f64();
            if x.is_nan() {
                return (a, OpError::WasNan);
            }
            (Qword::from(-x), OpError::None)
        }
        _ => unreachable!("invalid type for 'neg'"),
    }
}

/// Conversion between two built-in types. Reserved.
///
/// TODO: implement once the front-end starts folding `Convert` nodes.
pub fn cnv(_a: Qword, _from: BuiltinId, _to: BuiltinId) -> OpResult {
    (Qword::ZERO, OpError::None)
}

/// The engine operation for a binary operator, indexed by the operator's
/// discriminant. Assignment operators have no engine counterpart.
pub fn op_for_binary(op: BinaryOp) -> Option<BinOpFn> {
    const OP_TABLE: [BinOpFn; 18] = [
        add, sub, mul, div, modulo, bit_and, bit_or, bit_xor, shl, shr, bool_and, bool_or, le,
        leq, ge, geq, neq, eq,
    ];
    if op.is_assignment() {
        return None;
    }
    Some(OP_TABLE[op as u8 as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(v: impl Into<Qword>) -> Qword {
        v.into()
    }

    // =========================================================================
    // CHECKED ARITHMETIC
    // =========================================================================

    #[test]
    fn test_add_i8_overflow_wraps() {
        let (value, err) = add(q(120i8), q(10i8), BuiltinId::I8);
        assert_eq!(err, OpError::SignedOverflow);
        assert_eq!(value.as_u8(), 130);
        assert_eq!(value.as_i8(), -126);
    }

    #[test]
    fn test_add_i8_underflow() {
        let (value, err) = add(q(-120i8), q(-10i8), BuiltinId::I8);
        assert_eq!(err, OpError::SignedUnderflow);
        assert_eq!(value.as_i8(), (-120i8).wrapping_add(-10));
    }

    #[test]
    fn test_sub_unsigned_underflow() {
        let (value, err) = sub(q(1u32), q(2u32), BuiltinId::U32);
        assert_eq!(err, OpError::UnsignedUnderflow);
        assert_eq!(value.as_u32(), u32::MAX);
    }

    #[test]
    fn test_sub_signed_overflow_with_negative_rhs() {
        let (_, err) = sub(q(i16::MAX), q(-1i16), BuiltinId::I16);
        assert_eq!(err, OpError::SignedOverflow);
    }

    #[test]
    fn test_mul_unsigned_overflow() {
        let (_, err) = mul(q(0x80u8), q(2u8), BuiltinId::U8);
        assert_eq!(err, OpError::UnsignedOverflow);
        let (value, err) = mul(q(10u8), q(10u8), BuiltinId::U8);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_u8(), 100);
    }

    #[test]
    fn test_mul_signed_direction() {
        let (_, err) = mul(q(i8::MAX), q(2i8), BuiltinId::I8);
        assert_eq!(err, OpError::SignedOverflow);
        let (_, err) = mul(q(i8::MAX), q(-2i8), BuiltinId::I8);
        assert_eq!(err, OpError::SignedUnderflow);
        let (_, err) = mul(q(i8::MIN), q(-1i8), BuiltinId::I8);
        assert_eq!(err, OpError::SignedOverflow);
    }

    #[test]
    fn test_div_by_zero() {
        let (_, err) = div(q(7u32), q(0u32), BuiltinId::U32);
        assert_eq!(err, OpError::DivByZero);
        let (_, err) = div(q(7i64), q(0i64), BuiltinId::I64);
        assert_eq!(err, OpError::DivByZero);
        let (_, err) = modulo(q(7u8), q(0u8), BuiltinId::U8);
        assert_eq!(err, OpError::DivByZero);
    }

    #[test]
    fn test_div_min_by_minus_one() {
        let (_, err) = div(q(i32::MIN), q(-1i32), BuiltinId::I32);
        assert_eq!(err, OpError::SignedOverflow);
    }

    #[test]
    fn test_float_div_by_zero_is_not_an_integer_error() {
        let (value, err) = div(q(1.0f64), q(0.0f64), BuiltinId::F64);
        assert_eq!(err, OpError::None);
        assert!(value.as_f64().is_infinite());
    }

    /// Exhaustive overflow-flag correctness over all of i8 x i8.
    #[test]
    fn test_i8_flags_match_wide_arithmetic() {
        for a in i8::MIN..=i8::MAX {
            for b in i8::MIN..=i8::MAX {
                let cases: [(BinOpFn, fn(i16, i16) -> i16); 3] = [
                    (add, |x, y| x + y),
                    (sub, |x, y| x - y),
                    (mul, |x, y| x * y),
                ];
                for (op, wide) in cases {
                    let (_, err) = op(q(a), q(b), BuiltinId::I8);
                    let exact = wide(a as i16, b as i16);
                    let fits = exact >= i8::MIN as i16 && exact <= i8::MAX as i16;
                    assert_eq!(
                        err == OpError::None,
                        fits,
                        "a={} b={} exact={} err={:?}",
                        a,
                        b,
                        exact,
                        err
                    );
                }
            }
        }
    }

    /// Exhaustive overflow-flag correctness over all of u8 x u8.
    #[test]
    fn test_u8_flags_match_wide_arithmetic() {
        for a in 0u8..=u8::MAX {
            for b in 0u8..=u8::MAX {
                let (_, err) = add(q(a), q(b), BuiltinId::U8);
                assert_eq!(err == OpError::None, (a as u16 + b as u16) <= 255);

                let (_, err) = sub(q(a), q(b), BuiltinId::U8);
                assert_eq!(err == OpError::None, a >= b);

                let (_, err) = mul(q(a), q(b), BuiltinId::U8);
                assert_eq!(err == OpError::None, (a as u16 * b as u16) <= 255);
            }
        }
    }

    // =========================================================================
    // BITWISE AND SHIFTS
    // =========================================================================

    #[test]
    fn test_bit_ops() {
        let (value, err) = bit_and(q(0b1100u8), q(0b1010u8), BuiltinId::U8);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_u8(), 0b1000);

        let (value, _) = bit_or(q(0b1100u8), q(0b1010u8), BuiltinId::U8);
        assert_eq!(value.as_u8(), 0b1110);

        let (value, _) = bit_xor(q(0b1100u8), q(0b1010u8), BuiltinId::U8);
        assert_eq!(value.as_u8(), 0b0110);
    }

    #[test]
    fn test_bit_not_masks_to_width() {
        let (value, err) = bit_not(q(0x00u8), BuiltinId::U8);
        assert_eq!(err, OpError::None);
        assert_eq!(value.bits(), 0xFF);

        let (value, _) = bit_not(q(0u16), BuiltinId::U16);
        assert_eq!(value.bits(), 0xFFFF);

        let (value, _) = bit_not(q(0u64), BuiltinId::U64);
        assert_eq!(value.bits(), u64::MAX);
    }

    #[test]
    fn test_shift_width_guard() {
        let (_, err) = shl(q(1u16), q(16u64), BuiltinId::U16);
        assert_eq!(err, OpError::ShiftGeWidth);

        let (value, err) = shl(q(1u16), q(15u64), BuiltinId::U16);
        assert_eq!(err, OpError::None);
        assert_eq!(value.bits(), 1 << 15);

        let (_, err) = shr(q(1u8), q(8u64), BuiltinId::U8);
        assert_eq!(err, OpError::ShiftGeWidth);
        let (value, err) = shr(q(0x80u8), q(7u64), BuiltinId::U8);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_u8(), 1);
    }

    // =========================================================================
    // BOOLEANS AND COMPARISONS
    // =========================================================================

    #[test]
    fn test_bool_ops() {
        let (value, _) = bool_and(q(true), q(false), BuiltinId::Bool);
        assert!(!value.as_bool());
        let (value, _) = bool_or(q(true), q(false), BuiltinId::Bool);
        assert!(value.as_bool());
    }

    #[test]
    fn test_eq_and_neq() {
        let (value, err) = eq(q(42u32), q(42u32), BuiltinId::U32);
        assert_eq!(err, OpError::None);
        assert!(value.as_bool());

        let (value, _) = neq(q(42u32), q(42u32), BuiltinId::U32);
        assert!(!value.as_bool());

        let (value, _) = eq(q('a'), q('b'), BuiltinId::Char);
        assert!(!value.as_bool());
    }

    #[test]
    fn test_signed_ordering() {
        let (value, _) = le(q(-1i32), q(1i32), BuiltinId::I32);
        assert!(value.as_bool());
        let (value, _) = ge(q(-1i32), q(1i32), BuiltinId::I32);
        assert!(!value.as_bool());
        let (value, _) = leq(q(5i8), q(5i8), BuiltinId::I8);
        assert!(value.as_bool());
        let (value, _) = geq(q(5i8), q(5i8), BuiltinId::I8);
        assert!(value.as_bool());
    }

    #[test]
    fn test_unsigned_ordering_is_not_signed() {
        // 0xFF as u8 is 255, not -1
        let (value, _) = ge(q(0xFFu8), q(1u8), BuiltinId::U8);
        assert!(value.as_bool());
    }

    // =========================================================================
    // NAN PROPAGATION
    // =========================================================================

    #[test]
    fn test_nan_input_short_circuits() {
        let nan = q(f64::NAN);
        let (value, err) = add(nan, q(1.0f64), BuiltinId::F64);
        assert_eq!(err, OpError::WasNan);
        assert!(value.as_f64().is_nan());

        let (_, err) = add(q(1.0f64), nan, BuiltinId::F64);
        assert_eq!(err, OpError::WasNan);

        let (_, err) = le(q(f32::NAN), q(1.0f32), BuiltinId::F32);
        assert_eq!(err, OpError::WasNan);

        let (_, err) = eq(nan, nan, BuiltinId::F64);
        assert_eq!(err, OpError::WasNan);

        let (_, err) = neg(nan, BuiltinId::F64);
        assert_eq!(err, OpError::WasNan);
    }

    #[test]
    fn test_nan_result_is_flagged() {
        let inf = q(f64::INFINITY);
        let (value, err) = sub(inf, inf, BuiltinId::F64);
        assert_eq!(err, OpError::RetNan);
        assert!(value.as_f64().is_nan());

        let (_, err) = div(q(0.0f64), q(0.0f64), BuiltinId::F64);
        assert_eq!(err, OpError::RetNan);
    }

    // =========================================================================
    // NEGATION
    // =========================================================================

    #[test]
    fn test_neg() {
        let (value, err) = neg(q(5i32), BuiltinId::I32);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_i32(), -5);

        let (value, err) = neg(q(2.5f64), BuiltinId::F64);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_f64(), -2.5);

        let (value, err) = neg(q(i8::MIN), BuiltinId::I8);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_i8(), i8::MIN);
    }

    // =========================================================================
    // DISPATCH TABLE
    // =========================================================================

    #[test]
    fn test_dispatch_table_order() {
        let sum = op_for_binary(BinaryOp::Sum).expect("a computational operator");
        let (value, err) = sum(q(2i64), q(3i64), BuiltinId::I64);
        assert_eq!(err, OpError::None);
        assert_eq!(value.as_i64(), 5);

        let equal = op_for_binary(BinaryOp::Eq).expect("a computational operator");
        let (value, _) = equal(q(7u8), q(7u8), BuiltinId::U8);
        assert!(value.as_bool());

        let shift = op_for_binary(BinaryOp::Shl).expect("a computational operator");
        let (value, _) = shift(q(1u32), q(4u64), BuiltinId::U32);
        assert_eq!(value.bits(), 16);
    }

    #[test]
    fn test_dispatch_table_excludes_assignments() {
        assert!(op_for_binary(BinaryOp::Assign).is_none());
        assert!(op_for_binary(BinaryOp::AssignShr).is_none());
        assert!(op_for_binary(BinaryOp::Eq).is_some());
    }

    #[test]
    fn test_explanations() {
        assert_eq!(OpError::DivByZero.explain(), "Integral division by zero!");
        assert_eq!(
            OpError::ShiftGeWidth.explain(),
            "Shift by value greater than bits size!"
        );
        assert_eq!(OpError::None.explain(), "No errors detected!");
    }
}
