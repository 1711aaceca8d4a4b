//! Error types for backend submission and execution.

use fori_dtype::DeviceSpec;
use fori_ir::Shape;
use snafu::Snafu;

/// Result type for runtime operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while compiling or executing a submitted computation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Wrong number of operands for the computation's parameters.
    #[snafu(display("'{computation}' takes {expected} operands, got {actual}"))]
    OperandCount { computation: String, expected: usize, actual: usize },

    /// An operand does not have its parameter's shape.
    #[snafu(display("operand {index} of '{computation}' has shape {actual}, expected {expected}"))]
    OperandShape { computation: String, index: usize, expected: Shape, actual: Shape },

    /// An operand lives on a different device than the backend.
    #[snafu(display("operand {index} is on {actual}, backend runs on {expected}"))]
    OperandDevice { index: usize, expected: DeviceSpec, actual: DeviceSpec },

    /// No backend factory for the device type.
    #[snafu(display("unsupported device: {device}"))]
    UnsupportedDevice { device: String },

    /// Structural verification failed.
    #[snafu(display("failed to compile '{computation}': {reason}"))]
    Compile { computation: String, reason: String },

    /// Interpretation failed.
    #[snafu(display("execution error: {reason}"))]
    Execution { reason: String },

    /// A WHILE did not reach its terminal state within the configured bound.
    #[snafu(display("while loop '{computation}' exceeded {limit} iterations"))]
    IterationLimit { computation: String, limit: usize },

    /// IR error while materializing a value.
    #[snafu(display("IR error: {source}"))]
    Ir { source: fori_ir::Error },
}
