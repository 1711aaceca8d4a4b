use std::collections::BTreeMap;
use std::sync::Arc;

use snafu::{OptionExt, ResultExt, ensure};

use fori_dtype::{DType, DeviceSpec};
use fori_ir::{Dim, HostScalar, Literal, Shape};

pub mod device;
pub mod error;
use error::*;

pub use device::DeviceSpecExt;


/// A concrete tensor living on a device.
///
/// Data is held as a host-side [`Literal`] shared between clones; the device
/// tag says where the tensor is placed. Axes can be marked dynamic, in which
/// case [`Tensor::shape`] reports them as [`Dim::Dynamic`] while the data keeps
/// its current extent.
///
/// # Examples
///
/// ```
/// # use fori_tensor::Tensor;
/// let counter = Tensor::from_slice(&[0i32]);
/// assert_eq!(counter.to_vec::<i32>().unwrap(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    literal: Arc<Literal>,
    device: DeviceSpec,
    /// Axis -> optional upper bound, for axes reported as dynamic.
    dynamic: BTreeMap<usize, Option<usize>>,
}

impl Tensor {
    /// Tensor over an existing literal.
    pub fn from_literal(literal: Literal, device: DeviceSpec) -> Self {
        Self { literal: Arc::new(literal), device, dynamic: BTreeMap::new() }
    }

    /// 1-D tensor on the CPU.
    pub fn from_slice<T: HostScalar>(values: &[T]) -> Self {
        Self::from_slice_on(DeviceSpec::Cpu, values)
    }

    /// 1-D tensor on `device`.
    pub fn from_slice_on<T: HostScalar>(device: DeviceSpec, values: &[T]) -> Self {
        Self::from_literal(Literal::vector(values), device)
    }

    /// Tensor of the given dimensions from row-major host data.
    pub fn from_shape_vec<T: HostScalar>(device: DeviceSpec, dims: &[usize], values: &[T]) -> Result<Self> {
        let literal = Literal::from_slice(dims, values).context(LiteralSnafu)?;
        Ok(Self::from_literal(literal, device))
    }

    /// Rank-0 tensor on the CPU.
    pub fn scalar<T: HostScalar>(value: T) -> Self {
        Self::from_literal(Literal::scalar(value), DeviceSpec::Cpu)
    }

    /// Same tensor placed on `device`.
    pub fn to_device(&self, device: DeviceSpec) -> Self {
        Self { device, ..self.clone() }
    }

    /// Mark `axis` as dynamic, optionally bounded.
    pub fn with_dynamic_dim(&self, axis: usize, bound: Option<usize>) -> Result<Self> {
        let ndim = self.literal.dims().len();
        ensure!(axis < ndim, AxisOutOfRangeSnafu { axis, ndim });
        if let Some(bound) = bound {
            let extent = self.literal.dims()[axis];
            ensure!(bound >= extent, BoundTooSmallSnafu { axis, bound, extent });
        }
        let mut tensor = self.clone();
        tensor.dynamic.insert(axis, bound);
        Ok(tensor)
    }

    /// Shape as seen by the IR; marked axes are dynamic.
    pub fn shape(&self) -> Shape {
        let dims = self.literal.dims().iter().enumerate().map(|(axis, &extent)| match self.dynamic.get(&axis) {
            Some(&bound) => Dim::Dynamic { bound },
            None => Dim::Static(extent),
        });
        Shape::array_with_dims(self.literal.dtype(), dims)
    }

    pub fn dtype(&self) -> DType {
        self.literal.dtype()
    }

    /// Current extents of the data.
    pub fn dims(&self) -> &[usize] {
        self.literal.dims()
    }

    pub fn ndim(&self) -> usize {
        self.literal.dims().len()
    }

    pub fn device(&self) -> &DeviceSpec {
        &self.device
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Elements as host values.
    pub fn to_vec<T: HostScalar>(&self) -> Result<Vec<T>> {
        let actual = self.literal.dtype();
        ensure!(actual == T::DTYPE, ElementTypeMismatchSnafu { actual, requested: T::DTYPE });
        self.literal.to_vec::<T>().context(ElementTypeMismatchSnafu { actual, requested: T::DTYPE })
    }
}

impl std::fmt::Display for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.shape(), self.literal)
    }
}
