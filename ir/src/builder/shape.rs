//! Conversions and shape manipulation: convert, copy, reshape, broadcast, slice, index.

use fori_dtype::DType;
use smallvec::SmallVec;
use snafu::{OptionExt, ensure};

use crate::builder::Value;
use crate::error::{
    BroadcastRequiresScalarSnafu, DynamicShapeUnsupportedSnafu, ReshapeSizeMismatchSnafu, Result,
    SliceOutOfBoundsSnafu, SliceRankMismatchSnafu,
};
use crate::op::Op;
use crate::shape::Shape;

impl Value {
    /// Element type conversion with the casting rules of [`crate::ConstValue::cast`].
    pub fn convert(&self, dtype: DType) -> Result<Value> {
        self.array_dtype("convert")?;
        self.emit(&[self], Op::Convert(self.id), self.shape.with_dtype(dtype))
    }

    /// A new instruction holding the same value.
    pub fn copy(&self) -> Result<Value> {
        self.emit(&[self], Op::Copy(self.id), self.shape.clone())
    }

    pub fn reshape(&self, dims: &[usize]) -> Result<Value> {
        let dtype = self.array_dtype("reshape")?;
        let input_size = self.static_element_count("reshape")?;
        let output_size = dims.iter().product::<usize>();
        ensure!(input_size == output_size, ReshapeSizeMismatchSnafu { input_size, output_size });
        self.emit(&[self], Op::Reshape(self.id), Shape::array(dtype, dims.iter().copied()))
    }

    /// Replicate a scalar to `dims`.
    pub fn broadcast(&self, dims: &[usize]) -> Result<Value> {
        let dtype = self.array_dtype("broadcast")?;
        ensure!(self.shape.rank() == Some(0), BroadcastRequiresScalarSnafu { actual: self.shape.clone() });
        self.emit(&[self], Op::Broadcast(self.id), Shape::array(dtype, dims.iter().copied()))
    }

    /// Per-dimension `[start, limit)` window.
    pub fn slice(&self, starts: &[usize], limits: &[usize]) -> Result<Value> {
        let dtype = self.array_dtype("slice")?;
        let dims = self.static_dims("slice")?;
        ensure!(
            starts.len() == dims.len() && limits.len() == dims.len(),
            SliceRankMismatchSnafu { rank: dims.len(), starts: starts.len(), limits: limits.len() }
        );
        for (dim, ((&start, &limit), &size)) in starts.iter().zip(limits).zip(&dims).enumerate() {
            ensure!(start <= limit && limit <= size, SliceOutOfBoundsSnafu { dim, start, limit, size });
        }

        let result = Shape::array(dtype, starts.iter().zip(limits).map(|(start, limit)| limit - start));
        let op = Op::Slice { operand: self.id, starts: starts.into(), limits: limits.into() };
        self.emit(&[self], op, result)
    }

    /// Element `index` of a rank-1 value, as a scalar.
    pub fn index(&self, index: usize) -> Result<Value> {
        let rank = self.shape.rank().unwrap_or(0);
        ensure!(rank == 1, SliceRankMismatchSnafu { rank, starts: 1usize, limits: 1usize });
        let size = self.static_dims("index")?[0];
        let limit =
            index.checked_add(1).context(SliceOutOfBoundsSnafu { dim: 0usize, start: index, limit: usize::MAX, size })?;
        self.slice(&[index], &[limit])?.reshape(&[])
    }

    fn static_dims(&self, op: &'static str) -> Result<SmallVec<[usize; 4]>> {
        match self.shape.to_static() {
            Some(dims) => Ok(dims),
            None => DynamicShapeUnsupportedSnafu { op, actual: self.shape.clone() }.fail(),
        }
    }

    fn static_element_count(&self, op: &'static str) -> Result<usize> {
        Ok(self.static_dims(op)?.iter().product())
    }
}
