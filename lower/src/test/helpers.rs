//! Shared fixtures for lowering tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fori_dtype::DeviceSpec;
use fori_ir::{Builder, Computation, Shape, Value};
use fori_runtime::{Backend, CPU_TAG, CpuBackend, InterpreterConfig};
use fori_tensor::Tensor;

use crate::config::LoweringConfig;
use crate::context::LoopContext;
use crate::placeholder::{Placeholder, make_parameters};

/// CPU backend that counts submissions.
pub struct CountingBackend {
    inner: CpuBackend,
    tag: &'static str,
    submits: AtomicUsize,
}

impl CountingBackend {
    pub fn new(max_while_iterations: usize) -> Self {
        Self::tagged(CPU_TAG, max_while_iterations)
    }

    pub fn tagged(tag: &'static str, max_while_iterations: usize) -> Self {
        let config = InterpreterConfig::builder().max_while_iterations(max_while_iterations).build();
        Self { inner: CpuBackend::with_config(config), tag, submits: AtomicUsize::new(0) }
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }
}

impl Backend for CountingBackend {
    fn tag(&self) -> &str {
        self.tag
    }

    fn device(&self) -> &DeviceSpec {
        self.inner.device()
    }

    fn submit(&self, computation: &Computation, operands: &[Tensor], op_tag: &str) -> fori_runtime::Result<Vec<Tensor>> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.inner.submit(computation, operands, op_tag)
    }
}

/// CPU context with default names and a counting backend.
pub fn counting_context(max_while_iterations: usize) -> (LoopContext, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend::new(max_while_iterations));
    (context_on(backend.clone()), backend)
}

pub fn context_on(backend: Arc<CountingBackend>) -> LoopContext {
    LoopContext::new(backend).with_config(LoweringConfig::default())
}

pub fn s32(value: i32) -> Tensor {
    Tensor::from_slice(&[value])
}

pub fn s32_1() -> Shape {
    Shape::array(fori_dtype::DType::Int32, [1])
}

/// Placeholders for `shapes` in a fresh context named `name`.
pub fn placeholders(name: &str, shapes: &[Shape]) -> (Builder, Vec<Placeholder>) {
    let builder = Builder::new(name);
    let placeholders = make_parameters(&builder, shapes).unwrap();
    (builder, placeholders)
}

/// `(i, n) -> i < n`.
pub fn less_than(s: &[Value]) -> fori_ir::Result<Value> {
    s[0].lt(&s[1])?.index(0)
}

/// `(i, n) -> (i + 1, n)`.
pub fn increment(s: &[Value]) -> fori_ir::Result<Vec<Value>> {
    let one = s[0].builder().constant_r1(&[1i32])?;
    Ok(vec![s[0].add(&one)?, s[1].clone()])
}
