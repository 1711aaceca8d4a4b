use fori_dtype::DType;
use snafu::Snafu;

use crate::shape::Shape;
use crate::types::{BinaryOp, UnaryOp};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    // =========================================================================
    // Build context misuse
    // =========================================================================
    /// The build context was already turned into a computation.
    #[snafu(display("build context '{builder}' is already finalized"))]
    BuilderFinalized { builder: String },

    /// A value created in one build context was used in another.
    #[snafu(display("value #{value} belongs to build context #{owner}, not to '{builder}' (#{builder_id})"))]
    ForeignValue { builder: String, builder_id: u64, owner: u64, value: usize },

    /// Two parameters were declared with the same index.
    #[snafu(display("parameter {index} is declared twice in '{builder}'"))]
    DuplicateParameter { builder: String, index: usize },

    /// Parameter indices must be contiguous from zero.
    #[snafu(display("parameter {missing} is missing in '{builder}': indices must be contiguous from 0"))]
    ParameterGap { builder: String, missing: usize },

    // =========================================================================
    // Shape and dtype checks
    // =========================================================================
    /// DType mismatch between operands.
    #[snafu(display("dtype mismatch in {op}: {lhs} vs {rhs}"))]
    DTypeMismatch { op: &'static str, lhs: DType, rhs: DType },

    /// Operand shapes differ where they must be identical.
    #[snafu(display("shape mismatch in {op}: {lhs} vs {rhs}"))]
    ShapeMismatch { op: &'static str, lhs: Shape, rhs: Shape },

    /// Invalid dtype for a unary operation.
    #[snafu(display("invalid dtype for {operation}: {dtype}"))]
    InvalidDTypeForUnaryOp { operation: UnaryOp, dtype: DType },

    /// Invalid dtype for a binary operation.
    #[snafu(display("invalid dtype for {operation}: {dtype}"))]
    InvalidDTypeForBinaryOp { operation: BinaryOp, dtype: DType },

    /// SELECT predicate must be boolean.
    #[snafu(display("select predicate must be pred, got {actual}"))]
    SelectPredicateNotBool { actual: Shape },

    /// The operation needs an array operand.
    #[snafu(display("{op} expects an array operand, got {actual}"))]
    ExpectedArray { op: &'static str, actual: Shape },

    /// The operation needs a tuple operand.
    #[snafu(display("{op} expects a tuple operand, got {actual}"))]
    ExpectedTuple { op: &'static str, actual: Shape },

    /// Tuple element index out of range.
    #[snafu(display("tuple index {index} out of range for {shape}"))]
    TupleIndexOutOfBounds { index: usize, shape: Shape },

    /// The operation needs static dimensions.
    #[snafu(display("{op} requires a static shape, got {actual}"))]
    DynamicShapeUnsupported { op: &'static str, actual: Shape },

    /// Reshape size mismatch.
    #[snafu(display("reshape size mismatch: input size {input_size} != output size {output_size}"))]
    ReshapeSizeMismatch { input_size: usize, output_size: usize },

    /// BROADCAST requires scalar source.
    #[snafu(display("broadcast requires a scalar source, got {actual}"))]
    BroadcastRequiresScalar { actual: Shape },

    /// Slice bounds are invalid for the operand.
    #[snafu(display("slice [{start}, {limit}) of dimension {dim} is invalid for size {size}"))]
    SliceOutOfBounds { dim: usize, start: usize, limit: usize, size: usize },

    /// Slice bounds must be given for every dimension.
    #[snafu(display("slice rank mismatch: operand rank {rank}, {starts} starts and {limits} limits"))]
    SliceRankMismatch { rank: usize, starts: usize, limits: usize },

    /// Literal data length does not match its dimensions.
    #[snafu(display("literal has {actual} values but its dimensions need {expected}"))]
    LiteralSizeMismatch { expected: usize, actual: usize },

    // =========================================================================
    // Higher-order operations
    // =========================================================================
    /// A WHILE condition or body signature disagrees with the carried state.
    #[snafu(display("while {part} signature mismatch: expected {expected}, got {actual}"))]
    WhileSignatureMismatch { part: &'static str, expected: Shape, actual: Shape },
}

impl Error {
    /// Whether the error comes from misusing a build context rather than from
    /// the operations recorded in it.
    pub const fn is_builder_misuse(&self) -> bool {
        matches!(
            self,
            Self::BuilderFinalized { .. }
                | Self::ForeignValue { .. }
                | Self::DuplicateParameter { .. }
                | Self::ParameterGap { .. }
        )
    }
}
