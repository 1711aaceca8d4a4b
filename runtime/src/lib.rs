//! Execution backends for fused loop computations.
//!
//! Provides the [`Backend`] interface the lowering submits to, a reference CPU
//! backend that verifies and interprets IR (including WHILE), a global
//! executable cache, and a registry resolving backends per device.

pub mod backend;
pub mod backend_registry;
pub mod compile;
pub mod config;
pub mod devices;
pub mod error;
pub mod executable_cache;
pub mod interpreter;

#[cfg(test)]
pub mod test;

pub use backend::Backend;
pub use backend_registry::{BACKENDS, BackendFactory, BackendRegistry};
pub use config::InterpreterConfig;
pub use devices::cpu::{CPU_TAG, CpuBackend};
pub use error::*;
pub use executable_cache::Executable;
pub use interpreter::{HostValue, Interpreter};
