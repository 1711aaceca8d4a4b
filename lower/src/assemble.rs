//! Assembly of the fused WHILE computation.

use std::sync::Arc;

use fori_ir::{Builder, Computation, DType, Shape, Value};
use snafu::{ResultExt, ensure};
use tracing::{debug, trace};

use crate::error::{BuilderStateSnafu, LoopSignatureMismatchSnafu, Result, Signature};
use crate::placeholder::{self, Placeholder};
use crate::stage::LoweringStage;
use crate::trace::Subcomputation;

/// Top-level computation whose root is a single WHILE over the placeholders.
#[derive(Debug, Clone)]
pub struct TopLevelComputation {
    computation: Arc<Computation>,
    module: String,
    arity: usize,
}

impl TopLevelComputation {
    pub fn name(&self) -> &str {
        self.computation.name()
    }

    pub fn computation(&self) -> &Arc<Computation> {
        &self.computation
    }

    /// Text module, nested computations first.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Number of loop-carried values.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Check `condition` and `body` against the carried state, then emit
/// `WHILE(condition, body, tuple(placeholders))` as the root of `builder`.
///
/// The computation takes the name of `builder`. Signatures are checked in the
/// order condition input, body input, condition output, body output; nothing
/// is emitted when any of them disagrees.
pub fn assemble(
    condition: &Subcomputation,
    body: &Subcomputation,
    placeholders: &[Placeholder],
    builder: &Builder,
) -> Result<TopLevelComputation> {
    let state = Shape::tuple(placeholder::shapes(placeholders));
    let condition_shape = condition.program_shape();
    let body_shape = body.program_shape();

    check(Signature::ConditionInput, &state, &condition_shape.parameter_tuple())?;
    check(Signature::BodyInput, &state, &body_shape.parameter_tuple())?;
    check(Signature::ConditionOutput, &Shape::scalar(DType::Bool), &condition_shape.result)?;
    check(Signature::BodyOutput, &state, &body_shape.result)?;

    let context = || BuilderStateSnafu { context: builder.name(), stage: LoweringStage::BodyTraced };
    let values: Vec<Value> = placeholders.iter().map(|p| p.value().clone()).collect();
    let init = builder.tuple(&values).with_context(|_| context())?;
    let root = builder
        .while_loop(Arc::clone(condition.computation()), Arc::clone(body.computation()), &init)
        .with_context(|_| context())?;
    let computation = builder.build(&root).with_context(|_| context())?;

    let module = computation.to_module();
    debug!(name = computation.name(), condition = condition.name(), body = body.name(), "while assembled");
    trace!(name = computation.name(), "{}", computation.tree());
    Ok(TopLevelComputation { computation: Arc::new(computation), module, arity: placeholders.len() })
}

fn check(signature: Signature, expected: &Shape, actual: &Shape) -> Result<()> {
    ensure!(
        expected == actual,
        LoopSignatureMismatchSnafu { signature, expected: expected.clone(), actual: actual.clone() }
    );
    Ok(())
}
