//! Accelerator intermediate representation for fused loop lowering.
//!
//! This crate defines the IR that loop lowering emits and execution backends
//! consume: shapes, literals, instructions, the recording [`Builder`], and the
//! immutable [`Computation`] it produces.
//!
//! # Module Organization
//!
//! - [`types`] - Scalar constants and operation kinds
//! - [`shape`] - Array and tuple shapes, static and dynamic dimensions
//! - [`literal`] - Host-side array constants
//! - [`op`] - Instruction set, including the higher-order WHILE
//! - [`builder`] - Build contexts and symbolic values
//! - [`computation`] - Finalized computations, hashing, structural equality
//! - [`printer`] - Text module serialization
//! - [`tree`] - ASCII tree dumps for debug logs
//! - [`eval`] - Element-wise evaluation used by interpreters
//! - [`error`] - Error types and result handling

pub mod builder;
pub mod computation;
pub mod error;
pub mod eval;
pub mod literal;
pub mod op;
pub mod printer;
pub mod shape;
pub mod tree;
pub mod types;


pub use builder::{Builder, Value};
pub use computation::{Computation, ProgramShape};
pub use error::{Error, Result};
pub use literal::Literal;
pub use op::{InstrId, Instruction, Op};
pub use shape::{Dim, Dims, Shape};
pub use types::{BinaryOp, ComparisonDirection, ConstValue, HostScalar, UnaryOp};

pub use fori_dtype::{DType, DeviceSpec, HasDType};
