//! Lowering of host while loops into a single fused WHILE operation.
//!
//! Instead of driving a loop from the host and dispatching each iteration,
//! [`lower_loop`] traces the condition and body once into IR computations,
//! wraps them in one WHILE over the loop-carried state, and submits that to
//! the backend in a single request.
//!
//! # Module Organization
//!
//! - [`shapes`] - Static shapes of the concrete operands
//! - [`placeholder`] - Symbolic parameters for the carried state
//! - [`trace`] - Tracing functions into named sub-computations
//! - [`assemble`] - Signature checks and WHILE emission
//! - [`invoke`] - Single-request submission to the backend
//! - [`registry`] - Lowering rules per primitive and backend
//! - [`fori`] - Counted loops on top of the fused WHILE
//! - [`stage`] - Progress of a lowering call
//! - [`config`] - Names and IR dumps
//! - [`error`] - Error types and result handling
//!
//! # Example
//!
//! ```
//! use fori_dtype::DeviceSpec;
//! use fori_ir::Value;
//! use fori_lower::{LoopContext, lower_loop};
//! use fori_tensor::Tensor;
//!
//! let ctx = LoopContext::for_device(DeviceSpec::Cpu).unwrap();
//! let operands = [Tensor::from_slice(&[0i32]), Tensor::from_slice(&[10i32])];
//! let results = lower_loop(
//!     &ctx,
//!     |s: &[Value]| -> fori_ir::Result<Value> { s[0].lt(&s[1])?.index(0) },
//!     |s: &[Value]| -> fori_ir::Result<Vec<Value>> {
//!         let one = s[0].builder().constant_r1(&[1i32])?;
//!         Ok(vec![s[0].add(&one)?, s[1].clone()])
//!     },
//!     &operands,
//! )
//! .unwrap();
//! assert_eq!(results[0].to_vec::<i32>().unwrap(), vec![10]);
//! ```

pub mod assemble;
pub mod config;
pub mod context;
pub mod error;
pub mod fori;
pub mod invoke;
pub mod placeholder;
pub mod registry;
pub mod shapes;
pub mod stage;
pub mod trace;


use fori_ir::{Builder, Value};
use fori_tensor::Tensor;
use snafu::ensure;
use tracing::{debug_span, info};

pub use assemble::{TopLevelComputation, assemble};
pub use config::LoweringConfig;
pub use context::LoopContext;
pub use error::{BoxError, Error, Result, Signature};
pub use fori::fori_loop;
pub use invoke::invoke;
pub use placeholder::{Placeholder, make_parameters};
pub use registry::{FusedWhileLowering, LOWERINGS, LoopFn, LoopLowering, LoweringRegistry, PrimitiveKind, while_loop};
pub use shapes::{TensorLike, shapes_of};
pub use stage::LoweringStage;
pub use trace::{Subcomputation, TraceOutput, TracedOutput, trace};

use error::EmptyLoopStateSnafu;
use stage::StageTracker;

/// Run `while condition(state) { state = body(state) }` on the backend of
/// `ctx` as one fused WHILE, starting from `operands`.
///
/// Both functions are traced exactly once, over symbolic values with the
/// shapes of `operands`. `condition` must return a `pred[]`; `body` must
/// return as many values as there are operands, with the same shapes. At
/// least one operand is required. The backend is contacted once, and only
/// after every signature has been checked.
pub fn lower_loop<C, B, OC, OB, EC, EB>(ctx: &LoopContext, condition: C, body: B, operands: &[Tensor]) -> Result<Vec<Tensor>>
where
    C: FnOnce(&[Value]) -> std::result::Result<OC, EC>,
    B: FnOnce(&[Value]) -> std::result::Result<OB, EB>,
    OC: TraceOutput,
    OB: TraceOutput,
    EC: Into<BoxError>,
    EB: Into<BoxError>,
{
    let config = ctx.config();
    let _span = debug_span!("lower_loop", loop_name = %config.loop_name, device = %ctx.device(), arity = operands.len())
        .entered();
    let mut stages = StageTracker::new(&config.loop_name);

    ensure!(!operands.is_empty(), EmptyLoopStateSnafu);
    let shapes = shapes_of(operands)?;
    stages.advance(LoweringStage::ShapesComputed);

    let builder = Builder::new(config.loop_name.as_str());
    let placeholders = make_parameters(&builder, &shapes)?;
    stages.advance(LoweringStage::PlaceholdersBuilt);

    let condition = trace(&config.condition_name, condition, &placeholders)?;
    stages.advance(LoweringStage::CondTraced);

    // The body root is a tuple even when a single value is carried.
    let body = trace(
        &config.body_name,
        |values: &[Value]| body(values).map(|out| TracedOutput::Many(out.into_traced().into_values())),
        &placeholders,
    )
    .map_err(|e| e.at_stage(stages.current()))?;
    stages.advance(LoweringStage::BodyTraced);

    let top = assemble(&condition, &body, &placeholders, &builder)?;
    stages.advance(LoweringStage::Assembled);
    if config.dump_ir {
        info!(name = top.name(), "{}", top.module());
    }

    let results = invoke(ctx, &top, operands, &config.op_tag)?;
    stages.advance(LoweringStage::Invoked);
    stages.advance(LoweringStage::Done);
    Ok(results)
}
