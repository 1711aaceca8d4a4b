//! Element-wise evaluation of IR operations on [`ConstValue`].
//!
//! Used by execution backends that interpret the IR on the host. Every result is
//! re-cast to the result element type, so integer arithmetic wraps at the width
//! of the operand dtype rather than at 64 bits.
//!
//! Functions return `None` when the operation is undefined for the inputs
//! (mismatched value kinds, integer division by zero).

use fori_dtype::DType;

use crate::types::{BinaryOp, ComparisonDirection, ConstValue, UnaryOp};

pub fn eval_unary_op(op: UnaryOp, v: ConstValue, dtype: DType) -> Option<ConstValue> {
    let result = match (op, v) {
        (UnaryOp::Neg, ConstValue::Int(x)) => ConstValue::Int(x.wrapping_neg()),
        (UnaryOp::Neg, ConstValue::UInt(x)) => ConstValue::UInt(x.wrapping_neg()),
        (UnaryOp::Neg, ConstValue::Float(x)) => ConstValue::Float(-x),
        (UnaryOp::Not, ConstValue::Bool(x)) => ConstValue::Bool(!x),
        (UnaryOp::Not, ConstValue::Int(x)) => ConstValue::Int(!x),
        (UnaryOp::Not, ConstValue::UInt(x)) => ConstValue::UInt(!x),
        (UnaryOp::Abs, ConstValue::Int(x)) => ConstValue::Int(x.wrapping_abs()),
        (UnaryOp::Abs, ConstValue::UInt(x)) => ConstValue::UInt(x),
        (UnaryOp::Abs, ConstValue::Float(x)) => ConstValue::Float(x.abs()),
        _ => return None,
    };
    Some(result.cast(dtype))
}

pub fn eval_binary_op(op: BinaryOp, a: ConstValue, b: ConstValue, dtype: DType) -> Option<ConstValue> {
    let result = match op {
        BinaryOp::Add => eval_add(a, b),
        BinaryOp::Sub => eval_sub(a, b),
        BinaryOp::Mul => eval_mul(a, b),
        BinaryOp::Div => eval_div(a, b),
        BinaryOp::Rem => eval_rem(a, b),
        BinaryOp::Max => eval_max(a, b),
        BinaryOp::Min => eval_min(a, b),
        BinaryOp::And => eval_and(a, b),
        BinaryOp::Or => eval_or(a, b),
    }?;
    Some(result.cast(dtype))
}

pub fn eval_compare(direction: ComparisonDirection, a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    use std::cmp::Ordering;

    let ordering = match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => x.partial_cmp(&y),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => x.partial_cmp(&y),
        (ConstValue::Float(x), ConstValue::Float(y)) => x.partial_cmp(&y),
        (ConstValue::Bool(x), ConstValue::Bool(y)) => x.partial_cmp(&y),
        _ => return None,
    };

    // Unordered (NaN) operands compare false except for Ne.
    let Some(ordering) = ordering else {
        return Some(ConstValue::Bool(direction == ComparisonDirection::Ne));
    };

    let holds = match direction {
        ComparisonDirection::Eq => ordering == Ordering::Equal,
        ComparisonDirection::Ne => ordering != Ordering::Equal,
        ComparisonDirection::Lt => ordering == Ordering::Less,
        ComparisonDirection::Le => ordering != Ordering::Greater,
        ComparisonDirection::Gt => ordering == Ordering::Greater,
        ComparisonDirection::Ge => ordering != Ordering::Less,
    };
    Some(ConstValue::Bool(holds))
}

// ============================================================================
// Binary Arithmetic Operations
// ============================================================================

#[inline]
fn eval_add(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x.wrapping_add(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x.wrapping_add(y))),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x + y)),
        _ => None,
    }
}

#[inline]
fn eval_sub(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x.wrapping_sub(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x.wrapping_sub(y))),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x - y)),
        _ => None,
    }
}

#[inline]
fn eval_mul(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x.wrapping_mul(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x.wrapping_mul(y))),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x * y)),
        _ => None,
    }
}

#[inline]
fn eval_div(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) if y != 0 => Some(ConstValue::Int(x.wrapping_div(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) if y != 0 => Some(ConstValue::UInt(x / y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x / y)),
        _ => None,
    }
}

#[inline]
fn eval_rem(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) if y != 0 => Some(ConstValue::Int(x.wrapping_rem(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) if y != 0 => Some(ConstValue::UInt(x % y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x % y)),
        _ => None,
    }
}

#[inline]
fn eval_max(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x.max(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x.max(y))),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x.max(y))),
        (ConstValue::Bool(x), ConstValue::Bool(y)) => Some(ConstValue::Bool(x | y)),
        _ => None,
    }
}

#[inline]
fn eval_min(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x.min(y))),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x.min(y))),
        (ConstValue::Float(x), ConstValue::Float(y)) => Some(ConstValue::Float(x.min(y))),
        (ConstValue::Bool(x), ConstValue::Bool(y)) => Some(ConstValue::Bool(x & y)),
        _ => None,
    }
}

// ============================================================================
// Logical Operations
// ============================================================================

#[inline]
fn eval_and(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Bool(x), ConstValue::Bool(y)) => Some(ConstValue::Bool(x & y)),
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x & y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x & y)),
        _ => None,
    }
}

#[inline]
fn eval_or(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::Bool(x), ConstValue::Bool(y)) => Some(ConstValue::Bool(x | y)),
        (ConstValue::Int(x), ConstValue::Int(y)) => Some(ConstValue::Int(x | y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => Some(ConstValue::UInt(x | y)),
        _ => None,
    }
}
