//! Counted loops built on the fused WHILE.

use fori_ir::{Literal, Value};
use fori_tensor::Tensor;
use tracing::debug;

use crate::context::LoopContext;
use crate::error::{BoxError, Result};
use crate::registry;
use crate::trace::TraceOutput;

/// Run `body(i, state)` for `i` in `lower..upper` and return the final state.
///
/// The counter and the upper bound are carried as two extra `s32[]` values in
/// front of `init`, so the whole loop is still one fused WHILE. An empty range
/// returns `init` unchanged.
pub fn fori_loop<F, O, E>(ctx: &LoopContext, lower: i32, upper: i32, body: F, init: &[Tensor]) -> Result<Vec<Tensor>>
where
    F: FnOnce(&Value, &[Value]) -> std::result::Result<O, E>,
    O: TraceOutput,
    E: Into<BoxError>,
{
    debug!(lower, upper, arity = init.len(), "fori loop");
    let scalar = |v: i32| Tensor::from_literal(Literal::scalar(v), ctx.device().clone());
    let operands: Vec<Tensor> = [scalar(lower), scalar(upper)].into_iter().chain(init.iter().cloned()).collect();

    let condition = |values: &[Value]| values[0].lt(&values[1]);
    let step = |values: &[Value]| -> std::result::Result<Vec<Value>, BoxError> {
        let (i, upper) = (&values[0], &values[1]);
        let one = i.builder().constant_r0(1i32)?;
        let state = body(i, &values[2..]).map_err(|e| -> BoxError { e.into() })?.into_traced().into_values();
        Ok([i.add(&one)?, upper.clone()].into_iter().chain(state).collect())
    };

    let mut results = registry::while_loop(ctx, condition, step, &operands)?;
    Ok(results.split_off(2))
}
