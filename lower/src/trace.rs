//! Tracing host functions into named sub-computations.
//!
//! Each traced function gets its own build context. The placeholders of the
//! caller are re-declared there with the same indices and shapes, so the
//! function only ever sees values it can legally combine.

use std::sync::Arc;

use fori_ir::{Builder, Computation, ProgramShape, Value};
use snafu::IntoError;
use tracing::{debug, trace as trace_event};

use crate::error::{BoxError, BuilderStateSnafu, Result, TracingSnafu};
use crate::placeholder::{self, Placeholder, make_parameters};
use crate::stage::LoweringStage;

/// What a traced function hands back.
#[derive(Debug, Clone)]
pub enum TracedOutput {
    /// One value, used as the root directly.
    Single(Value),
    /// Several values, wrapped in a tuple root.
    Many(Vec<Value>),
}

impl TracedOutput {
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Single(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Return types accepted from traced functions.
pub trait TraceOutput {
    fn into_traced(self) -> TracedOutput;
}

impl TraceOutput for TracedOutput {
    fn into_traced(self) -> TracedOutput {
        self
    }
}

impl TraceOutput for Value {
    fn into_traced(self) -> TracedOutput {
        TracedOutput::Single(self)
    }
}

impl TraceOutput for Vec<Value> {
    fn into_traced(self) -> TracedOutput {
        TracedOutput::Many(self)
    }
}

impl<const N: usize> TraceOutput for [Value; N] {
    fn into_traced(self) -> TracedOutput {
        TracedOutput::Many(self.into())
    }
}

/// A finalized, named computation produced by tracing.
#[derive(Debug, Clone)]
pub struct Subcomputation {
    computation: Arc<Computation>,
    module: String,
}

impl Subcomputation {
    pub fn name(&self) -> &str {
        self.computation.name()
    }

    pub fn computation(&self) -> &Arc<Computation> {
        &self.computation
    }

    /// Text module of the computation.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn program_shape(&self) -> ProgramShape {
        self.computation.program_shape()
    }
}

/// Trace `trace_fn` once over symbolic copies of `placeholders` and finalize
/// the result as a computation named `context_name`.
///
/// Misuse of a build context (a finalized builder, a value from another
/// context) is reported as [`Error::BuilderState`](crate::Error::BuilderState);
/// any other failure of `trace_fn` as [`Error::Tracing`](crate::Error::Tracing).
pub fn trace<F, O, E>(context_name: &str, trace_fn: F, placeholders: &[Placeholder]) -> Result<Subcomputation>
where
    F: FnOnce(&[Value]) -> std::result::Result<O, E>,
    O: TraceOutput,
    E: Into<BoxError>,
{
    let builder = Builder::new(context_name);
    let params = make_parameters(&builder, &placeholder::shapes(placeholders))
        .map_err(|e| e.at_stage(LoweringStage::PlaceholdersBuilt))?;
    let args: Vec<Value> = params.iter().map(|p| p.value().clone()).collect();

    let output = trace_fn(&args).map_err(|e| classify(context_name, e.into()))?;
    let computation = match output.into_traced() {
        TracedOutput::Single(root) => builder.build(&root),
        TracedOutput::Many(outputs) => builder.build_tuple(&outputs),
    }
    .map_err(|e| classify(context_name, Box::new(e)))?;

    let module = computation.to_module();
    trace_event!(context = context_name, tree = %computation.tree(), "{module}");
    debug!(context = context_name, signature = %computation.program_shape(), "traced");
    Ok(Subcomputation { computation: Arc::new(computation), module })
}

fn classify(context: &str, error: BoxError) -> crate::Error {
    let stage = LoweringStage::PlaceholdersBuilt;
    match error.downcast::<fori_ir::Error>() {
        Ok(ir) if ir.is_builder_misuse() => BuilderStateSnafu { context, stage }.into_error(*ir),
        Ok(ir) => TracingSnafu { context, stage }.into_error(ir as BoxError),
        Err(other) => TracingSnafu { context, stage }.into_error(other),
    }
}
