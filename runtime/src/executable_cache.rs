//! Global executable deduplication cache.
//!
//! Maps (content hash, op tag, device) to verified executables. Uses papaya's
//! lock-free HashMap so concurrent submissions can share one compilation.
//!
//! The content hash ignores computation and parameter names, so retracing the
//! same loop under fresh names hits the cache.

use std::sync::{Arc, OnceLock};

use fori_dtype::DeviceSpec;
use fori_ir::Computation;
use papaya::HashMap;
use tracing::debug;

/// A computation that passed verification for one device and op tag.
#[derive(Debug)]
pub struct Executable {
    pub computation: Arc<Computation>,
    pub op_tag: String,
    pub device: DeviceSpec,
    pub content_hash: u64,
}

/// Cache key: (content hash, op tag, device).
type ExecutableKey = (u64, String, DeviceSpec);

static EXECUTABLES: OnceLock<HashMap<ExecutableKey, Arc<Executable>>> = OnceLock::new();

fn executables() -> &'static HashMap<ExecutableKey, Arc<Executable>> {
    EXECUTABLES.get_or_init(HashMap::new)
}

/// Get or compile an executable.
///
/// If several threads miss on the same key concurrently, each compiles but
/// only the first insert wins and everyone receives that executable.
pub fn get_or_compile<F, E>(
    computation: &Computation,
    op_tag: &str,
    device: &DeviceSpec,
    compile_fn: F,
) -> Result<Arc<Executable>, E>
where
    F: FnOnce() -> Result<Executable, E>,
{
    let content_hash = computation.content_hash();
    let key = (content_hash, op_tag.to_string(), device.clone());
    let map = executables();
    let guard = map.guard();

    if let Some(cached) = map.get(&key, &guard) {
        debug!(op_tag, %device, content_hash, "executable cache hit");
        return Ok(Arc::clone(cached));
    }

    let compiled = Arc::new(compile_fn()?);
    debug!(op_tag, %device, content_hash, computation = computation.name(), "executable compiled");

    use papaya::{Compute, Operation};
    match map.compute(
        key,
        |entry| match entry {
            Some((_, existing)) => Operation::Abort(Arc::clone(existing)),
            None => Operation::Insert(Arc::clone(&compiled)),
        },
        &guard,
    ) {
        Compute::Inserted(_, executable) => Ok(Arc::clone(executable)),
        Compute::Aborted(executable) => Ok(executable),
        _ => Ok(compiled),
    }
}

/// Number of cached executables.
pub fn cached_count() -> usize {
    executables().len()
}

/// Clear all cached executables.
pub fn clear_all() {
    let guard = executables().guard();
    executables().clear(&guard);
}
