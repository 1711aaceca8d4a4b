//! Tuples and the higher-order WHILE.

use std::sync::Arc;

use fori_dtype::DType;
use snafu::ensure;

use crate::builder::{Builder, Value};
use crate::computation::Computation;
use crate::error::{ExpectedTupleSnafu, Result, TupleIndexOutOfBoundsSnafu, WhileSignatureMismatchSnafu};
use crate::op::Op;
use crate::shape::Shape;

impl Builder {
    /// Aggregate `elements` into one tuple value.
    pub fn tuple(&self, elements: &[Value]) -> Result<Value> {
        for element in elements {
            self.check_owned(element)?;
        }
        let shape = Shape::tuple(elements.iter().map(|e| e.shape.clone()));
        self.push(Op::Tuple(elements.iter().map(|e| e.id).collect()), shape)
    }

    /// Emit `while condition(state) { state = body(state) }` starting from `init`.
    ///
    /// `init` must be a tuple; its elements are the positional parameters of
    /// both callees. The condition must return `pred[]` and the body must return
    /// a tuple of exactly the init shape.
    pub fn while_loop(&self, condition: Arc<Computation>, body: Arc<Computation>, init: &Value) -> Result<Value> {
        self.check_owned(init)?;
        ensure!(init.shape.is_tuple(), ExpectedTupleSnafu { op: "while", actual: init.shape.clone() });

        let cond_shape = condition.program_shape();
        let body_shape = body.program_shape();
        ensure_signature("condition input", &init.shape, cond_shape.parameter_tuple())?;
        ensure_signature("body input", &init.shape, body_shape.parameter_tuple())?;
        ensure!(
            cond_shape.result.is_scalar_pred(),
            WhileSignatureMismatchSnafu {
                part: "condition output",
                expected: Shape::scalar(DType::Bool),
                actual: cond_shape.result.clone(),
            }
        );
        ensure_signature("body output", &init.shape, body_shape.result)?;

        self.push(Op::While { condition, body, init: init.id }, init.shape.clone())
    }
}

fn ensure_signature(part: &'static str, expected: &Shape, actual: Shape) -> Result<()> {
    ensure!(*expected == actual, WhileSignatureMismatchSnafu { part, expected: expected.clone(), actual });
    Ok(())
}

impl Value {
    pub fn get_tuple_element(&self, index: usize) -> Result<Value> {
        let Some(elements) = self.shape.tuple_elements() else {
            return ExpectedTupleSnafu { op: "get-tuple-element", actual: self.shape.clone() }.fail();
        };
        let Some(element) = elements.get(index) else {
            return TupleIndexOutOfBoundsSnafu { index, shape: self.shape.clone() }.fail();
        };
        let shape = element.clone();
        self.emit(&[self], Op::GetTupleElement { operand: self.id, index }, shape)
    }
}
