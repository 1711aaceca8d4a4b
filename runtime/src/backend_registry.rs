//! Backend factory registry with per-device caching.

use std::collections::HashMap;
use std::sync::Arc;

use fori_dtype::DeviceSpec;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use snafu::OptionExt;
use tracing::debug;

use crate::backend::Backend;
use crate::devices::cpu::{CPU_TAG, CpuBackend};
use crate::error::{Result, UnsupportedDeviceSnafu};

/// Factory creating a backend for a device specification.
pub type BackendFactory = Arc<dyn Fn(&DeviceSpec) -> Result<Arc<dyn Backend>> + Send + Sync>;

/// Registry of backend factories keyed by device type, caching one backend per device.
///
/// Uses `parking_lot::RwLock` with double-checked locking: lookups of cached
/// backends take a read lock, creation takes the write lock once.
pub struct BackendRegistry {
    /// Cached backend instances (DeviceSpec -> Backend)
    backends: RwLock<HashMap<DeviceSpec, Arc<dyn Backend>>>,
    /// Registered factories (device type string -> factory function)
    factories: RwLock<HashMap<String, BackendFactory>>,
}

impl BackendRegistry {
    /// Create a registry with the built-in CPU factory registered.
    pub fn new() -> Self {
        let registry = Self { backends: RwLock::new(HashMap::new()), factories: RwLock::new(HashMap::new()) };
        registry.register_factory(CPU_TAG, Arc::new(|_spec| Ok(Arc::new(CpuBackend::new()) as Arc<dyn Backend>)));
        registry
    }

    /// Register a factory for a device type (case-insensitive).
    ///
    /// Backends already cached for that device type are dropped so the next
    /// lookup goes through the new factory.
    pub fn register_factory(&self, device_type: &str, factory: BackendFactory) {
        let device_type = device_type.to_uppercase();
        self.backends.write().retain(|spec, _| spec.base_type() != device_type);
        self.factories.write().insert(device_type, factory);
    }

    /// Get or create the backend for `spec`.
    pub fn backend(&self, spec: &DeviceSpec) -> Result<Arc<dyn Backend>> {
        if let Some(backend) = self.backends.read().get(spec) {
            return Ok(Arc::clone(backend));
        }

        let mut backends = self.backends.write();
        if let Some(backend) = backends.get(spec) {
            return Ok(Arc::clone(backend));
        }

        let device_type = spec.base_type();
        let factory = self
            .factories
            .read()
            .get(device_type)
            .cloned()
            .context(UnsupportedDeviceSnafu { device: spec.to_string() })?;

        let backend = factory(spec)?;
        debug!(device = %spec, tag = backend.tag(), "backend created");
        backends.insert(spec.clone(), Arc::clone(&backend));
        Ok(backend)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global backend registry, lazily initialized with built-in factories.
pub static BACKENDS: Lazy<BackendRegistry> = Lazy::new(BackendRegistry::new);
