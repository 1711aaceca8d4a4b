//! Reference interpreter for verified computations.
//!
//! Evaluates instructions in order on host literals. WHILE evaluates its
//! condition and body computations recursively until the condition yields
//! `false`, bounded by [`InterpreterConfig::max_while_iterations`].

use fori_dtype::DType;
use fori_ir::eval::{eval_binary_op, eval_compare, eval_unary_op};
use fori_ir::{Computation, ConstValue, Instruction, Literal, Op};
use smallvec::SmallVec;
use snafu::ResultExt;
use tracing::{trace, warn};

use crate::config::InterpreterConfig;
use crate::error::{ExecutionSnafu, IrSnafu, IterationLimitSnafu, Result};

/// A runtime value: an array literal or a tuple of values.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Array(Literal),
    Tuple(Vec<HostValue>),
}

impl HostValue {
    pub fn as_array(&self) -> Result<&Literal> {
        match self {
            Self::Array(literal) => Ok(literal),
            Self::Tuple(_) => ExecutionSnafu { reason: "expected an array value, found a tuple" }.fail(),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<HostValue>> {
        match self {
            Self::Tuple(elements) => Ok(elements),
            Self::Array(_) => ExecutionSnafu { reason: "expected a tuple value, found an array" }.fail(),
        }
    }

    /// Leaf arrays in order, descending into nested tuples.
    pub fn flatten(self) -> Vec<Literal> {
        match self {
            Self::Array(literal) => vec![literal],
            Self::Tuple(elements) => elements.into_iter().flat_map(Self::flatten).collect(),
        }
    }
}

pub struct Interpreter<'a> {
    config: &'a InterpreterConfig,
}

impl<'a> Interpreter<'a> {
    pub fn new(config: &'a InterpreterConfig) -> Self {
        Self { config }
    }

    /// Evaluate `computation` with positional `args`.
    pub fn run(&self, computation: &Computation, args: &[HostValue]) -> Result<HostValue> {
        let mut env: Vec<HostValue> = Vec::with_capacity(computation.instructions().len());
        for instr in computation.instructions() {
            let value = self.eval(instr, &env, args)?;
            trace!(computation = computation.name(), id = instr.id, op = %instr.op.opcode(), "evaluated");
            env.push(value);
        }
        env.into_iter().nth(computation.root_id()).ok_or_else(|| {
            ExecutionSnafu { reason: format!("root %{} of '{}' was not evaluated", computation.root_id(), computation.name()) }
                .build()
        })
    }

    fn eval(&self, instr: &Instruction, env: &[HostValue], args: &[HostValue]) -> Result<HostValue> {
        let dtype = instr.shape.dtype();
        let value = match &instr.op {
            Op::Parameter { index, .. } => args
                .get(*index)
                .cloned()
                .ok_or_else(|| ExecutionSnafu { reason: format!("missing argument {index}") }.build())?,
            Op::Constant(literal) => HostValue::Array(literal.clone()),
            Op::Unary(op, x) => {
                let x = env[*x].as_array()?;
                let dtype = x.dtype();
                map_elements(x, dtype, |v| eval_unary_op(*op, v, dtype), || format!("{op} on {dtype}"))?
            }
            Op::Binary(op, a, b) => {
                let (a, b) = (env[*a].as_array()?, env[*b].as_array()?);
                let dtype = a.dtype();
                zip_elements(a, b, dtype, |x, y| eval_binary_op(*op, x, y, dtype), || format!("{op} on {dtype}"))?
            }
            Op::Compare(direction, a, b) => {
                let (a, b) = (env[*a].as_array()?, env[*b].as_array()?);
                zip_elements(a, b, DType::Bool, |x, y| eval_compare(*direction, x, y), || format!("compare {direction}"))?
            }
            Op::Select { pred, on_true, on_false } => {
                let pred = env[*pred].as_array()?;
                let (on_true, on_false) = (env[*on_true].as_array()?, env[*on_false].as_array()?);
                select(pred, on_true, on_false)?
            }
            Op::Convert(x) => {
                let x = env[*x].as_array()?;
                let target = dtype.unwrap_or(x.dtype());
                map_elements(x, target, |v| Some(v.cast(target)), || format!("convert to {target}"))?
            }
            Op::Copy(x) => env[*x].clone(),
            Op::Reshape(x) => {
                let dims = static_dims(instr)?;
                HostValue::Array(env[*x].as_array()?.reshaped(dims).context(IrSnafu)?)
            }
            Op::Broadcast(x) => {
                let x = env[*x].as_array()?;
                let value = x.get(0).ok_or_else(|| ExecutionSnafu { reason: "broadcast of an empty literal" }.build())?;
                HostValue::Array(Literal::filled(x.dtype(), static_dims(instr)?, value))
            }
            Op::Slice { operand, starts, limits } => {
                HostValue::Array(slice(env[*operand].as_array()?, starts, limits)?)
            }
            Op::Tuple(elements) => HostValue::Tuple(elements.iter().map(|&e| env[e].clone()).collect()),
            Op::GetTupleElement { operand, index } => match &env[*operand] {
                HostValue::Tuple(elements) => elements
                    .get(*index)
                    .cloned()
                    .ok_or_else(|| ExecutionSnafu { reason: format!("tuple index {index} out of range") }.build())?,
                HostValue::Array(_) => return ExecutionSnafu { reason: "get-tuple-element of an array" }.fail(),
            },
            Op::While { condition, body, init } => self.run_while(condition, body, env[*init].clone())?,
        };
        Ok(value)
    }

    fn run_while(&self, condition: &Computation, body: &Computation, init: HostValue) -> Result<HostValue> {
        let limit = self.config.max_while_iterations;
        let mut state = init.into_tuple()?;
        let mut iterations = 0usize;
        loop {
            let keep_going = self.run(condition, &state)?;
            let keep_going = keep_going.as_array()?.get(0).and_then(|v| v.as_bool()).ok_or_else(|| {
                ExecutionSnafu { reason: format!("condition '{}' did not produce a predicate", condition.name()) }
                    .build()
            })?;
            if !keep_going {
                break;
            }
            if iterations == limit {
                warn!(condition = condition.name(), body = body.name(), limit, "while loop exceeded iteration bound");
                return IterationLimitSnafu { computation: body.name(), limit }.fail();
            }
            state = self.run(body, &state)?.into_tuple()?;
            iterations += 1;
        }
        trace!(condition = condition.name(), body = body.name(), iterations, "while loop finished");
        Ok(HostValue::Tuple(state))
    }
}

fn static_dims(instr: &Instruction) -> Result<SmallVec<[usize; 4]>> {
    instr
        .shape
        .to_static()
        .ok_or_else(|| ExecutionSnafu { reason: format!("%{} has no static shape", instr.id) }.build())
}

fn map_elements(
    x: &Literal,
    dtype: DType,
    f: impl Fn(ConstValue) -> Option<ConstValue>,
    describe: impl Fn() -> String,
) -> Result<HostValue> {
    let values = x
        .values()
        .iter()
        .map(|&v| f(v))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ExecutionSnafu { reason: format!("{} is undefined for some element", describe()) }.build())?;
    Ok(HostValue::Array(Literal::new(dtype, x.dims().iter().copied(), values).context(IrSnafu)?))
}

fn zip_elements(
    a: &Literal,
    b: &Literal,
    dtype: DType,
    f: impl Fn(ConstValue, ConstValue) -> Option<ConstValue>,
    describe: impl Fn() -> String,
) -> Result<HostValue> {
    if a.dims() != b.dims() {
        return ExecutionSnafu { reason: format!("{}: operand dims {:?} vs {:?}", describe(), a.dims(), b.dims()) }
            .fail();
    }
    let values = a
        .values()
        .iter()
        .zip(b.values())
        .map(|(&x, &y)| f(x, y))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ExecutionSnafu { reason: format!("{} is undefined for some element", describe()) }.build())?;
    Ok(HostValue::Array(Literal::new(dtype, a.dims().iter().copied(), values).context(IrSnafu)?))
}

fn select(pred: &Literal, on_true: &Literal, on_false: &Literal) -> Result<HostValue> {
    let pick = |i: usize| -> Result<ConstValue> {
        let p = if pred.dims().is_empty() { pred.get(0) } else { pred.get(i) };
        let p = p.and_then(|v| v.as_bool());
        let chosen = match p {
            Some(true) => on_true.get(i),
            Some(false) => on_false.get(i),
            None => None,
        };
        chosen.ok_or_else(|| ExecutionSnafu { reason: format!("select has no element {i}") }.build())
    };
    let values = (0..on_true.element_count()).map(pick).collect::<Result<Vec<_>>>()?;
    Ok(HostValue::Array(Literal::new(on_true.dtype(), on_true.dims().iter().copied(), values).context(IrSnafu)?))
}

/// Row-major window `[starts, limits)` of `x`.
fn slice(x: &Literal, starts: &[usize], limits: &[usize]) -> Result<Literal> {
    let dims = x.dims();
    let out_dims: SmallVec<[usize; 4]> = starts.iter().zip(limits).map(|(s, l)| l.saturating_sub(*s)).collect();
    let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(1, dims.len());
    for axis in (0..dims.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * dims[axis + 1];
    }

    let count = out_dims.iter().product::<usize>();
    let mut values = Vec::with_capacity(count);
    for flat in 0..count {
        let mut rem = flat;
        let mut source = 0;
        for axis in (0..out_dims.len()).rev() {
            let coord = rem % out_dims[axis];
            rem /= out_dims[axis];
            source += (starts[axis] + coord) * strides[axis];
        }
        let value =
            x.get(source).ok_or_else(|| ExecutionSnafu { reason: format!("slice reads element {source}") }.build())?;
        values.push(value);
    }
    Literal::new(x.dtype(), out_dims, values).context(IrSnafu)
}
