//! IR instructions.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::computation::Computation;
use crate::literal::Literal;
use crate::shape::Shape;
use crate::types::{BinaryOp, ComparisonDirection, UnaryOp};

/// Position of an instruction inside its computation (or build context).
pub type InstrId = usize;

/// Operation performed by one instruction.
///
/// Operands are referenced by [`InstrId`]; an operand always precedes its user,
/// so instruction order is a valid evaluation order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    /// Positional input of the computation.
    Parameter { index: usize, name: String },
    Constant(Literal),
    Unary(UnaryOp, InstrId),
    Binary(BinaryOp, InstrId, InstrId),
    Compare(ComparisonDirection, InstrId, InstrId),
    Select { pred: InstrId, on_true: InstrId, on_false: InstrId },
    /// Element type conversion; the target type is the instruction's shape.
    Convert(InstrId),
    /// Value copy. Gives a loop body a distinct output for state it passes through.
    Copy(InstrId),
    /// Same elements, new static dimensions (taken from the instruction's shape).
    Reshape(InstrId),
    /// Scalar replicated to the instruction's dimensions.
    Broadcast(InstrId),
    Slice { operand: InstrId, starts: SmallVec<[usize; 4]>, limits: SmallVec<[usize; 4]> },
    Tuple(SmallVec<[InstrId; 4]>),
    GetTupleElement { operand: InstrId, index: usize },
    /// Higher-order loop: `while condition(state) { state = body(state) }`.
    ///
    /// The tuple operand is unpacked into the positional parameters of both
    /// callees; the body returns the next state as a tuple.
    While { condition: Arc<Computation>, body: Arc<Computation>, init: InstrId },
}

impl Op {
    /// Operand instruction ids, in operand order.
    pub fn sources(&self) -> SmallVec<[InstrId; 4]> {
        match self {
            Self::Parameter { .. } | Self::Constant(_) => SmallVec::new(),
            Self::Unary(_, x)
            | Self::Convert(x)
            | Self::Copy(x)
            | Self::Reshape(x)
            | Self::Broadcast(x)
            | Self::Slice { operand: x, .. }
            | Self::GetTupleElement { operand: x, .. }
            | Self::While { init: x, .. } => smallvec![*x],
            Self::Binary(_, a, b) | Self::Compare(_, a, b) => smallvec![*a, *b],
            Self::Select { pred, on_true, on_false } => smallvec![*pred, *on_true, *on_false],
            Self::Tuple(elements) => elements.clone(),
        }
    }

    /// Textual opcode used by the module printer.
    pub fn opcode(&self) -> String {
        match self {
            Self::Parameter { .. } => "parameter".to_string(),
            Self::Constant(_) => "constant".to_string(),
            Self::Unary(op, _) => op.to_string(),
            Self::Binary(op, ..) => op.to_string(),
            Self::Compare(..) => "compare".to_string(),
            Self::Select { .. } => "select".to_string(),
            Self::Convert(_) => "convert".to_string(),
            Self::Copy(_) => "copy".to_string(),
            Self::Reshape(_) => "reshape".to_string(),
            Self::Broadcast(_) => "broadcast".to_string(),
            Self::Slice { .. } => "slice".to_string(),
            Self::Tuple(_) => "tuple".to_string(),
            Self::GetTupleElement { .. } => "get-tuple-element".to_string(),
            Self::While { .. } => "while".to_string(),
        }
    }

    /// Rewrite operand ids through `map`.
    pub(crate) fn remap(&self, map: impl Fn(InstrId) -> InstrId) -> Self {
        match self {
            Self::Parameter { .. } | Self::Constant(_) => self.clone(),
            Self::Unary(op, x) => Self::Unary(*op, map(*x)),
            Self::Binary(op, a, b) => Self::Binary(*op, map(*a), map(*b)),
            Self::Compare(dir, a, b) => Self::Compare(*dir, map(*a), map(*b)),
            Self::Select { pred, on_true, on_false } => {
                Self::Select { pred: map(*pred), on_true: map(*on_true), on_false: map(*on_false) }
            }
            Self::Convert(x) => Self::Convert(map(*x)),
            Self::Copy(x) => Self::Copy(map(*x)),
            Self::Reshape(x) => Self::Reshape(map(*x)),
            Self::Broadcast(x) => Self::Broadcast(map(*x)),
            Self::Slice { operand, starts, limits } => {
                Self::Slice { operand: map(*operand), starts: starts.clone(), limits: limits.clone() }
            }
            Self::Tuple(elements) => Self::Tuple(elements.iter().map(|&e| map(e)).collect()),
            Self::GetTupleElement { operand, index } => Self::GetTupleElement { operand: map(*operand), index: *index },
            Self::While { condition, body, init } => {
                Self::While { condition: condition.clone(), body: body.clone(), init: map(*init) }
            }
        }
    }

    /// Equality that ignores parameter names and the names of nested computations.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Parameter { index: a, .. }, Self::Parameter { index: b, .. }) => a == b,
            (
                Self::While { condition: c1, body: b1, init: i1 },
                Self::While { condition: c2, body: b2, init: i2 },
            ) => i1 == i2 && c1.structurally_eq(c2) && b1.structurally_eq(b2),
            _ => self == other,
        }
    }
}

/// One instruction of a computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instruction {
    pub id: InstrId,
    pub op: Op,
    pub shape: Shape,
}
