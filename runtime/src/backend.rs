//! Execution backend interface.

use fori_dtype::DeviceSpec;
use fori_ir::Computation;
use fori_tensor::Tensor;

use crate::error::Result;

/// Something that can run a finalized computation on real tensors.
///
/// `submit` is one blocking request: it returns once the computation has
/// finished, including any WHILE reaching its terminal state. A tuple result
/// is flattened into one tensor per element.
pub trait Backend: Send + Sync {
    /// Backend identifier used to select lowerings (e.g. `"CPU"`).
    fn tag(&self) -> &str;

    /// Device the backend executes on.
    fn device(&self) -> &DeviceSpec;

    /// Run `computation` on `operands`. `op_tag` names the fused operation for
    /// caching and diagnostics.
    fn submit(&self, computation: &Computation, operands: &[Tensor], op_tag: &str) -> Result<Vec<Tensor>>;
}
