//! Symbolic parameters standing in for the loop-carried state.

use fori_ir::{Builder, Shape, Value};
use snafu::ResultExt;
use tracing::trace;

use crate::error::{BuilderStateSnafu, Result};
use crate::stage::LoweringStage;

/// Parameter `index` of a build context, with the shape of the operand it
/// stands for.
#[derive(Debug, Clone)]
pub struct Placeholder {
    index: usize,
    shape: Shape,
    value: Value,
}

impl Placeholder {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The parameter value; only usable within the context that declared it.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Declare one parameter per shape in `builder`, indexed by position and
/// named `p{i}`.
pub fn make_parameters(builder: &Builder, shapes: &[Shape]) -> Result<Vec<Placeholder>> {
    let placeholders = shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let value = builder.parameter(index, shape.clone(), format!("p{index}")).context(BuilderStateSnafu {
                context: builder.name(),
                stage: LoweringStage::ShapesComputed,
            })?;
            Ok(Placeholder { index, shape: shape.clone(), value })
        })
        .collect::<Result<Vec<_>>>()?;
    trace!(context = %builder.name(), count = placeholders.len(), "placeholders declared");
    Ok(placeholders)
}

/// Shapes of `placeholders`, in order.
pub(crate) fn shapes(placeholders: &[Placeholder]) -> Vec<Shape> {
    placeholders.iter().map(|p| p.shape.clone()).collect()
}
