//! Submission of the fused computation to the backend.

use fori_tensor::Tensor;
use snafu::{IntoError, ResultExt};
use tracing::debug;

use crate::assemble::TopLevelComputation;
use crate::context::LoopContext;
use crate::error::{LoweringExecutionSnafu, Result};

/// Run `top` on the concrete `operands` in one backend request and return the
/// final loop state, one tensor per carried value.
pub fn invoke(ctx: &LoopContext, top: &TopLevelComputation, operands: &[Tensor], op_tag: &str) -> Result<Vec<Tensor>> {
    let backend = ctx.backend();
    debug!(op_tag, backend = backend.tag(), computation = top.name(), "submitting fused loop");
    let results = backend.submit(top.computation(), operands, op_tag).context(LoweringExecutionSnafu { op_tag })?;

    if results.len() != top.arity() {
        let reason = format!("backend returned {} values for a loop carrying {}", results.len(), top.arity());
        return Err(LoweringExecutionSnafu { op_tag }.into_error(fori_runtime::Error::Execution { reason }));
    }
    Ok(results)
}
