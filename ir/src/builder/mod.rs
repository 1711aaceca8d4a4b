//! Recording IR operations into a build context.
//!
//! A [`Builder`] is one build context: it owns an append-only list of
//! instructions and the parameters declared in it. Every [`Value`] it hands out
//! remembers the context that created it, and every operation checks that its
//! operands come from that same context. Once [`Builder::build`] succeeds the
//! context is sealed: further operations on the builder or on any of its values
//! fail with [`Error::BuilderFinalized`].
//!
//! Operations are grouped by category:
//!
//! - [`compute`] - Arithmetic, logical, and comparison operations
//! - [`shape`] - Conversions and shape manipulation (reshape, broadcast, slice)
//! - [`control`] - Tuples and the higher-order WHILE

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use snafu::ensure;
use tracing::trace;

use crate::computation::Computation;
use crate::error::{
    BuilderFinalizedSnafu, DuplicateParameterSnafu, ForeignValueSnafu, ParameterGapSnafu, Result,
};
use crate::literal::Literal;
use crate::op::{InstrId, Instruction, Op};
use crate::shape::Shape;
use crate::types::HostScalar;

pub mod compute;
pub mod control;
pub mod shape;

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct BuilderInner {
    id: u64,
    name: String,
    instructions: Vec<Instruction>,
    /// Parameter index -> instruction id.
    parameters: BTreeMap<usize, InstrId>,
    finalized: bool,
}

/// A build context for one computation.
///
/// Cloning a `Builder` yields another handle to the same context.
#[derive(Debug, Clone)]
pub struct Builder {
    inner: Rc<RefCell<BuilderInner>>,
}

/// Symbolic handle to an instruction recorded in a [`Builder`].
///
/// Carries a shape but no data.
#[derive(Debug, Clone)]
pub struct Value {
    ctx: Rc<RefCell<BuilderInner>>,
    builder_id: u64,
    id: InstrId,
    shape: Shape,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        let id = NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed);
        let inner = BuilderInner {
            id,
            name: name.into(),
            instructions: Vec::new(),
            parameters: BTreeMap::new(),
            finalized: false,
        };
        Self { inner: Rc::new(RefCell::new(inner)) }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// Process-unique id of this context.
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    pub fn is_finalized(&self) -> bool {
        self.inner.borrow().finalized
    }

    /// Number of parameters declared so far.
    pub fn parameter_count(&self) -> usize {
        self.inner.borrow().parameters.len()
    }

    /// Declare the positional parameter `index`.
    pub fn parameter(&self, index: usize, shape: Shape, name: impl Into<String>) -> Result<Value> {
        let mut inner = self.inner.borrow_mut();
        ensure!(!inner.finalized, BuilderFinalizedSnafu { builder: inner.name.clone() });
        ensure!(
            !inner.parameters.contains_key(&index),
            DuplicateParameterSnafu { builder: inner.name.clone(), index }
        );
        let id = inner.instructions.len();
        inner.instructions.push(Instruction { id, op: Op::Parameter { index, name: name.into() }, shape: shape.clone() });
        inner.parameters.insert(index, id);
        Ok(Value { ctx: self.inner.clone(), builder_id: inner.id, id, shape })
    }

    pub fn constant(&self, literal: Literal) -> Result<Value> {
        let shape = literal.shape();
        self.push(Op::Constant(literal), shape)
    }

    /// Rank-0 constant.
    pub fn constant_r0<T: HostScalar>(&self, value: T) -> Result<Value> {
        self.constant(Literal::scalar(value))
    }

    /// Rank-1 constant.
    pub fn constant_r1<T: HostScalar>(&self, values: &[T]) -> Result<Value> {
        self.constant(Literal::vector(values))
    }

    /// Finalize the context with `root` as its result.
    ///
    /// Only instructions reachable from the root survive, plus every declared
    /// parameter; ids are renumbered densely in creation order.
    pub fn build(&self, root: &Value) -> Result<Computation> {
        self.check_owned(root)?;
        let mut inner = self.inner.borrow_mut();

        let count = inner.parameters.len();
        if let Some(missing) = (0..count).find(|i| !inner.parameters.contains_key(i)) {
            return ParameterGapSnafu { builder: inner.name.clone(), missing }.fail();
        }

        let mut live = HashSet::new();
        let mut stack = vec![root.id];
        while let Some(id) = stack.pop() {
            if live.insert(id) {
                stack.extend(inner.instructions[id].op.sources());
            }
        }
        live.extend(inner.parameters.values().copied());

        let mut renumbered = vec![usize::MAX; inner.instructions.len()];
        let mut instructions = Vec::with_capacity(live.len());
        for instr in inner.instructions.iter().filter(|instr| live.contains(&instr.id)) {
            let id = instructions.len();
            renumbered[instr.id] = id;
            instructions.push(Instruction { id, op: instr.op.remap(|src| renumbered[src]), shape: instr.shape.clone() });
        }
        let parameters = inner.parameters.values().map(|&id| renumbered[id]).collect();
        let root_id = renumbered[root.id];

        inner.finalized = true;
        trace!(builder = %inner.name, instructions = instructions.len(), "build context finalized");
        Ok(Computation::new(inner.name.clone(), instructions, parameters, root_id))
    }

    /// Finalize the context with a tuple of `outputs` as its result.
    pub fn build_tuple(&self, outputs: &[Value]) -> Result<Computation> {
        let root = self.tuple(outputs)?;
        self.build(&root)
    }

    /// Record an instruction.
    pub(crate) fn push(&self, op: Op, shape: Shape) -> Result<Value> {
        let mut inner = self.inner.borrow_mut();
        ensure!(!inner.finalized, BuilderFinalizedSnafu { builder: inner.name.clone() });
        let id = inner.instructions.len();
        inner.instructions.push(Instruction { id, op, shape: shape.clone() });
        Ok(Value { ctx: self.inner.clone(), builder_id: inner.id, id, shape })
    }

    /// Fails unless `value` was created in this (still open) context.
    pub(crate) fn check_owned(&self, value: &Value) -> Result<()> {
        let inner = self.inner.borrow();
        ensure!(!inner.finalized, BuilderFinalizedSnafu { builder: inner.name.clone() });
        ensure!(
            value.builder_id == inner.id,
            ForeignValueSnafu {
                builder: inner.name.clone(),
                builder_id: inner.id,
                owner: value.builder_id,
                value: value.id,
            }
        );
        Ok(())
    }
}

impl Value {
    /// The context this value was recorded in.
    pub fn builder(&self) -> Builder {
        Builder { inner: self.ctx.clone() }
    }

    pub fn builder_id(&self) -> u64 {
        self.builder_id
    }

    /// Instruction id inside the owning context (before finalization renumbering).
    pub fn id(&self) -> InstrId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Record `op` in this value's context after checking that `operands` belong to it.
    pub(crate) fn emit(&self, operands: &[&Value], op: Op, shape: Shape) -> Result<Value> {
        let builder = self.builder();
        for operand in operands {
            builder.check_owned(operand)?;
        }
        builder.push(op, shape)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}: {}", self.id, self.shape)
    }
}
