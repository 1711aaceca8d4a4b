//! Host-side array constants.

use fori_dtype::DType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{LiteralSizeMismatchSnafu, Result};
use crate::shape::Shape;
use crate::types::{ConstValue, HostScalar};

/// A dense, row-major array of element values with a static shape.
///
/// Values are normalized to `dtype` on construction, so integer literals are
/// always stored truncated to the width of their element type.
#[derive(Debug, Clone, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Literal {
    dtype: DType,
    dims: SmallVec<[usize; 4]>,
    values: Vec<ConstValue>,
}

impl Literal {
    pub fn new(dtype: DType, dims: impl IntoIterator<Item = usize>, values: Vec<ConstValue>) -> Result<Self> {
        let dims: SmallVec<[usize; 4]> = dims.into_iter().collect();
        let expected = dims.iter().product::<usize>();
        ensure!(values.len() == expected, LiteralSizeMismatchSnafu { expected, actual: values.len() });
        let values = values.into_iter().map(|v| v.cast(dtype)).collect();
        Ok(Self { dtype, dims, values })
    }

    /// Rank-0 literal.
    pub fn scalar<T: HostScalar>(value: T) -> Self {
        Self { dtype: T::DTYPE, dims: SmallVec::new(), values: vec![value.into_const()] }
    }

    /// Rank-1 literal.
    pub fn vector<T: HostScalar>(values: &[T]) -> Self {
        Self {
            dtype: T::DTYPE,
            dims: SmallVec::from_slice(&[values.len()]),
            values: values.iter().map(|&v| v.into_const()).collect(),
        }
    }

    /// Literal of the given dimensions from row-major host data.
    pub fn from_slice<T: HostScalar>(dims: &[usize], values: &[T]) -> Result<Self> {
        Self::new(T::DTYPE, dims.iter().copied(), values.iter().map(|&v| v.into_const()).collect())
    }

    /// Every element set to `value`.
    pub fn filled(dtype: DType, dims: impl IntoIterator<Item = usize>, value: ConstValue) -> Self {
        let dims: SmallVec<[usize; 4]> = dims.into_iter().collect();
        let count = dims.iter().product::<usize>();
        Self { dtype, dims, values: vec![value.cast(dtype); count] }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn values(&self) -> &[ConstValue] {
        &self.values
    }

    pub fn element_count(&self) -> usize {
        self.values.len()
    }

    pub fn shape(&self) -> Shape {
        Shape::array(self.dtype, self.dims.iter().copied())
    }

    /// Element at a flat row-major position.
    pub fn get(&self, index: usize) -> Option<ConstValue> {
        self.values.get(index).copied()
    }

    /// Elements as host values, or `None` when `T` is not this literal's element type.
    pub fn to_vec<T: HostScalar>(&self) -> Option<Vec<T>> {
        if T::DTYPE != self.dtype {
            return None;
        }
        self.values.iter().map(|&v| T::from_const(v)).collect()
    }

    /// Same values viewed with different dimensions of equal element count.
    pub fn reshaped(&self, dims: impl IntoIterator<Item = usize>) -> Result<Self> {
        Self::new(self.dtype, dims, self.values.clone())
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.dims.is_empty() {
            return match self.values.first() {
                Some(v) => write!(f, "{v}"),
                None => f.write_str("{}"),
            };
        }
        f.write_str("{")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("}")
    }
}
