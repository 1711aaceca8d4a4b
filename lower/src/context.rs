use std::sync::Arc;

use fori_dtype::DeviceSpec;
use fori_runtime::{BACKENDS, Backend};
use snafu::ResultExt;

use crate::config::LoweringConfig;
use crate::error::{BackendUnavailableSnafu, Result};

/// Where a loop runs: the target device, the backend that executes the fused
/// operation, and the names used when emitting it.
#[derive(Clone)]
pub struct LoopContext {
    device: DeviceSpec,
    backend: Arc<dyn Backend>,
    config: LoweringConfig,
}

impl LoopContext {
    /// Context running on `backend`, on the device that backend executes on.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { device: backend.device().clone(), backend, config: LoweringConfig::from_env() }
    }

    /// Context for `device` with its backend taken from the global registry.
    pub fn for_device(device: DeviceSpec) -> Result<Self> {
        let backend = BACKENDS.backend(&device).context(BackendUnavailableSnafu { device: device.to_string() })?;
        Ok(Self::new(backend))
    }

    pub fn with_config(mut self, config: LoweringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn device(&self) -> &DeviceSpec {
        &self.device
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }
}

impl std::fmt::Debug for LoopContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopContext")
            .field("device", &self.device)
            .field("backend", &self.backend.tag())
            .field("config", &self.config)
            .finish()
    }
}
