//! Lowering rules per primitive and backend.
//!
//! A lowering turns a host-level loop primitive into backend work. The fused
//! WHILE lowering is registered for the CPU backend; other backends register
//! their own rule, or get [`Error::UnsupportedLowering`](crate::Error::UnsupportedLowering).

use std::collections::HashMap;
use std::sync::Arc;

use fori_ir::Value;
use fori_runtime::CPU_TAG;
use fori_tensor::Tensor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use snafu::OptionExt;
use tracing::debug;

use crate::context::LoopContext;
use crate::error::{BoxError, Result, UnsupportedLoweringSnafu};
use crate::trace::{TraceOutput, TracedOutput};

/// Loop primitives that can be lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PrimitiveKind {
    #[display("while")]
    While,
}

/// Type-erased traced function, as passed through a [`LoopLowering`].
pub type LoopFn<'a> = Box<dyn FnOnce(&[Value]) -> std::result::Result<TracedOutput, BoxError> + 'a>;

/// A rule lowering a loop primitive on one backend.
pub trait LoopLowering: Send + Sync {
    fn name(&self) -> &str;

    fn lower(&self, ctx: &LoopContext, condition: LoopFn<'_>, body: LoopFn<'_>, operands: &[Tensor])
    -> Result<Vec<Tensor>>;
}

/// Lowers a loop to one fused WHILE submitted in a single backend request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FusedWhileLowering;

impl LoopLowering for FusedWhileLowering {
    fn name(&self) -> &str {
        "fused_while"
    }

    fn lower(
        &self,
        ctx: &LoopContext,
        condition: LoopFn<'_>,
        body: LoopFn<'_>,
        operands: &[Tensor],
    ) -> Result<Vec<Tensor>> {
        crate::lower_loop(ctx, condition, body, operands)
    }
}

/// Registry of lowerings keyed by primitive and backend tag.
pub struct LoweringRegistry {
    lowerings: RwLock<HashMap<(PrimitiveKind, String), Arc<dyn LoopLowering>>>,
}

impl LoweringRegistry {
    /// Create a registry with the fused WHILE lowering registered for the CPU backend.
    pub fn new() -> Self {
        let registry = Self { lowerings: RwLock::new(HashMap::new()) };
        registry.register(PrimitiveKind::While, CPU_TAG, Arc::new(FusedWhileLowering));
        registry
    }

    /// Register `lowering` for `primitive` on backends tagged `backend` (case-insensitive).
    pub fn register(&self, primitive: PrimitiveKind, backend: &str, lowering: Arc<dyn LoopLowering>) {
        let backend = backend.to_uppercase();
        debug!(%primitive, backend, lowering = lowering.name(), "lowering registered");
        self.lowerings.write().insert((primitive, backend), lowering);
    }

    pub fn resolve(&self, primitive: PrimitiveKind, backend: &str) -> Result<Arc<dyn LoopLowering>> {
        self.lowerings
            .read()
            .get(&(primitive, backend.to_uppercase()))
            .cloned()
            .context(UnsupportedLoweringSnafu { primitive, backend })
    }

    /// Lower a while loop with the rule registered for the context's backend.
    pub fn while_loop<C, B, OC, OB, EC, EB>(
        &self,
        ctx: &LoopContext,
        condition: C,
        body: B,
        operands: &[Tensor],
    ) -> Result<Vec<Tensor>>
    where
        C: FnOnce(&[Value]) -> std::result::Result<OC, EC>,
        B: FnOnce(&[Value]) -> std::result::Result<OB, EB>,
        OC: TraceOutput,
        OB: TraceOutput,
        EC: Into<BoxError>,
        EB: Into<BoxError>,
    {
        let lowering = self.resolve(PrimitiveKind::While, ctx.backend().tag())?;
        lowering.lower(ctx, erase(condition), erase(body), operands)
    }
}

fn erase<'a, F, O, E>(f: F) -> LoopFn<'a>
where
    F: FnOnce(&[Value]) -> std::result::Result<O, E> + 'a,
    O: TraceOutput,
    E: Into<BoxError>,
{
    Box::new(move |values: &[Value]| -> std::result::Result<TracedOutput, BoxError> {
        f(values).map(TraceOutput::into_traced).map_err(Into::into)
    })
}

impl Default for LoweringRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global lowering registry.
pub static LOWERINGS: Lazy<LoweringRegistry> = Lazy::new(LoweringRegistry::new);

/// Lower a while loop through the global registry.
pub fn while_loop<C, B, OC, OB, EC, EB>(ctx: &LoopContext, condition: C, body: B, operands: &[Tensor]) -> Result<Vec<Tensor>>
where
    C: FnOnce(&[Value]) -> std::result::Result<OC, EC>,
    B: FnOnce(&[Value]) -> std::result::Result<OB, EB>,
    OC: TraceOutput,
    OB: TraceOutput,
    EC: Into<BoxError>,
    EB: Into<BoxError>,
{
    LOWERINGS.while_loop(ctx, condition, body, operands)
}
