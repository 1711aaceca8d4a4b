//! Shape inspection of loop operands.

use fori_ir::Shape;
use fori_tensor::Tensor;
use snafu::ensure;

use crate::error::{Result, UnsupportedShapeSnafu};

/// Anything that can be carried through a loop as a concrete value.
pub trait TensorLike {
    fn shape(&self) -> Shape;
}

impl TensorLike for Tensor {
    fn shape(&self) -> Shape {
        Tensor::shape(self)
    }
}

impl<T: TensorLike + ?Sized> TensorLike for &T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

/// Static array shape of each operand, in order.
///
/// Fails with [`Error::UnsupportedShape`](crate::Error::UnsupportedShape) on
/// the first operand that is a tuple or has a dynamic dimension.
pub fn shapes_of<T: TensorLike>(operands: &[T]) -> Result<Vec<Shape>> {
    operands
        .iter()
        .enumerate()
        .map(|(index, operand)| {
            let shape = operand.shape();
            ensure!(shape.is_array() && shape.is_static(), UnsupportedShapeSnafu { index, shape });
            Ok(shape)
        })
        .collect()
}
