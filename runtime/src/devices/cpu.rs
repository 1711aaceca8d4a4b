//! Host CPU backend.
//!
//! Validates operands against the computation's parameters, fetches or
//! compiles a verified executable from the global cache, and interprets it.

use std::sync::Arc;

use fori_dtype::DeviceSpec;
use fori_ir::Computation;
use fori_tensor::Tensor;
use snafu::ensure;
use tracing::debug;

use crate::backend::Backend;
use crate::compile::verify;
use crate::config::InterpreterConfig;
use crate::error::{OperandCountSnafu, OperandDeviceSnafu, OperandShapeSnafu, Result};
use crate::executable_cache::{Executable, get_or_compile};
use crate::interpreter::{HostValue, Interpreter};

/// Backend tag of [`CpuBackend`].
pub const CPU_TAG: &str = "CPU";

#[derive(Debug, Clone)]
pub struct CpuBackend {
    device: DeviceSpec,
    config: InterpreterConfig,
}

impl CpuBackend {
    /// CPU backend configured from the environment.
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::from_env())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { device: DeviceSpec::Cpu, config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    fn check_operands(&self, computation: &Computation, operands: &[Tensor]) -> Result<()> {
        let parameters = computation.program_shape().parameters;
        ensure!(
            parameters.len() == operands.len(),
            OperandCountSnafu {
                computation: computation.name(),
                expected: parameters.len(),
                actual: operands.len(),
            }
        );
        for (index, (expected, operand)) in parameters.into_iter().zip(operands).enumerate() {
            ensure!(
                operand.device() == &self.device,
                OperandDeviceSnafu { index, expected: self.device.clone(), actual: operand.device().clone() }
            );
            let actual = operand.shape();
            ensure!(
                actual == expected,
                OperandShapeSnafu { computation: computation.name(), index, expected, actual }
            );
        }
        Ok(())
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for CpuBackend {
    fn tag(&self) -> &str {
        CPU_TAG
    }

    fn device(&self) -> &DeviceSpec {
        &self.device
    }

    fn submit(&self, computation: &Computation, operands: &[Tensor], op_tag: &str) -> Result<Vec<Tensor>> {
        self.check_operands(computation, operands)?;

        let executable = get_or_compile(computation, op_tag, &self.device, || {
            verify(computation)?;
            Ok::<_, crate::Error>(Executable {
                computation: Arc::new(computation.clone()),
                op_tag: op_tag.to_string(),
                device: self.device.clone(),
                content_hash: computation.content_hash(),
            })
        })?;

        // A cache hit may hold a structurally equal computation under other
        // names; run the submitted one so diagnostics name what was submitted.
        let args: Vec<HostValue> = operands.iter().map(|t| HostValue::Array(t.literal().clone())).collect();
        let result = Interpreter::new(&self.config).run(computation, &args)?;
        let outputs: Vec<Tensor> =
            result.flatten().into_iter().map(|literal| Tensor::from_literal(literal, self.device.clone())).collect();

        debug!(
            op_tag,
            computation = computation.name(),
            hash = executable.content_hash,
            outputs = outputs.len(),
            "submission finished"
        );
        Ok(outputs)
    }
}
