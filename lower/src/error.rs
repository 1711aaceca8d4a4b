use fori_ir::Shape;
use snafu::Snafu;

use crate::registry::PrimitiveKind;
use crate::stage::LoweringStage;

/// Boxed error returned by traced functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which part of the loop signature disagreed with the carried state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Signature {
    #[display("condition input")]
    ConditionInput,
    #[display("body input")]
    BodyInput,
    #[display("condition output")]
    ConditionOutput,
    #[display("body output")]
    BodyOutput,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A loop must carry at least one value.
    #[snafu(display("loop carries no state: at least one operand is required"))]
    EmptyLoopState,

    /// An operand is not a static array.
    #[snafu(display("operand {index} has unsupported shape {shape}: loop state must be static arrays"))]
    UnsupportedShape { index: usize, shape: Shape },

    /// A build context was used after finalization or with a foreign value.
    #[snafu(display("build context '{context}' misused: {source}"))]
    BuilderState { context: String, stage: LoweringStage, source: fori_ir::Error },

    /// The traced function failed.
    #[snafu(display("tracing '{context}' failed: {source}"))]
    Tracing { context: String, stage: LoweringStage, source: BoxError },

    /// Condition or body signature disagrees with the loop-carried state.
    #[snafu(display("loop {signature} signature mismatch: expected {expected}, got {actual}"))]
    LoopSignatureMismatch { signature: Signature, expected: Shape, actual: Shape },

    /// The backend failed to compile or execute the fused loop.
    #[snafu(display("fused operation '{op_tag}' failed: {source}"))]
    LoweringExecution { op_tag: String, source: fori_runtime::Error },

    /// No lowering is registered for the primitive on this backend.
    #[snafu(display("no {primitive} lowering registered for backend '{backend}'"))]
    UnsupportedLowering { primitive: PrimitiveKind, backend: String },

    /// No backend could be resolved for the device.
    #[snafu(display("no backend for device {device}: {source}"))]
    BackendUnavailable { device: String, source: fori_runtime::Error },
}

impl Error {
    /// Stage the lowering call had reached when it failed.
    pub fn stage(&self) -> LoweringStage {
        match self {
            Self::EmptyLoopState
            | Self::UnsupportedShape { .. }
            | Self::UnsupportedLowering { .. }
            | Self::BackendUnavailable { .. } => LoweringStage::Start,
            Self::BuilderState { stage, .. } | Self::Tracing { stage, .. } => *stage,
            Self::LoopSignatureMismatch { .. } => LoweringStage::BodyTraced,
            Self::LoweringExecution { .. } => LoweringStage::Assembled,
        }
    }

    /// Re-home a tracing or build-context error to `stage`.
    pub(crate) fn at_stage(mut self, at: LoweringStage) -> Self {
        if let Self::BuilderState { stage, .. } | Self::Tracing { stage, .. } = &mut self {
            *stage = at;
        }
        self
    }
}
