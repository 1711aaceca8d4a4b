use fori_dtype::DType;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("IR literal error"))]
    Literal { source: fori_ir::Error },

    #[snafu(display("Invalid device string '{device}': expected CPU, CUDA[:id] or TPU[:id]"))]
    InvalidDevice { device: String },

    #[snafu(display("Axis {axis} is out of range for tensor with {ndim} dimensions"))]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[snafu(display("Dynamic bound {bound} on axis {axis} is smaller than its extent {extent}"))]
    BoundTooSmall { axis: usize, bound: usize, extent: usize },

    #[snafu(display("Element type mismatch: tensor holds {actual}, requested {requested}"))]
    ElementTypeMismatch { actual: DType, requested: DType },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
