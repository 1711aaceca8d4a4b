//! Finalized, immutable computations.

use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::op::{InstrId, Instruction, Op};
use crate::shape::Shape;

/// Parameter and result shapes of a computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgramShape {
    /// Shapes of the positional parameters, by index.
    pub parameters: Vec<Shape>,
    pub result: Shape,
}

impl ProgramShape {
    /// The parameters packed as one tuple shape.
    pub fn parameter_tuple(&self) -> Shape {
        Shape::tuple(self.parameters.iter().cloned())
    }
}

impl std::fmt::Display for ProgramShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.parameter_tuple(), self.result)
    }
}

/// A named IR graph produced by [`crate::Builder::build`].
///
/// Instructions are stored in evaluation order with dense ids; `parameters[i]`
/// is the instruction id of parameter `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Computation {
    name: String,
    instructions: Vec<Instruction>,
    parameters: Vec<InstrId>,
    root: InstrId,
}

impl Computation {
    pub(crate) fn new(name: String, instructions: Vec<Instruction>, parameters: Vec<InstrId>, root: InstrId) -> Self {
        Self { name, instructions, parameters, root }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, id: InstrId) -> Option<&Instruction> {
        self.instructions.get(id)
    }

    pub fn root(&self) -> &Instruction {
        &self.instructions[self.root]
    }

    pub fn root_id(&self) -> InstrId {
        self.root
    }

    /// Instruction ids of the parameters, by parameter index.
    pub fn parameter_ids(&self) -> &[InstrId] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn program_shape(&self) -> ProgramShape {
        ProgramShape {
            parameters: self.parameters.iter().map(|&id| self.instructions[id].shape.clone()).collect(),
            result: self.root().shape.clone(),
        }
    }

    /// Computations referenced by higher-order instructions, in instruction order.
    pub fn called_computations(&self) -> impl Iterator<Item = &Computation> {
        self.instructions.iter().flat_map(|instr| match &instr.op {
            Op::While { condition, body, .. } => vec![condition.as_ref(), body.as_ref()],
            _ => Vec::new(),
        })
    }

    /// Stable hash of the graph structure.
    ///
    /// Names of the computation, its parameters, and nested computations do not
    /// take part, so two traces of the same function hash equally.
    pub fn content_hash(&self) -> u64 {
        use xxhash_rust::xxh64::Xxh64;

        let mut hasher = Xxh64::new(0);
        self.hash_structure(&mut hasher);
        hasher.finish()
    }

    /// Equality up to naming, recursing into nested computations.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.parameters == other.parameters
            && self.instructions.len() == other.instructions.len()
            && self
                .instructions
                .iter()
                .zip(&other.instructions)
                .all(|(a, b)| a.shape == b.shape && a.op.structurally_eq(&b.op))
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.parameters.hash(state);
        self.root.hash(state);
        for instr in &self.instructions {
            instr.shape.hash(state);
            instr.op.opcode().hash(state);
            instr.op.sources().hash(state);
            match &instr.op {
                Op::Parameter { index, .. } => index.hash(state),
                Op::Constant(literal) => literal.hash(state),
                Op::Compare(direction, ..) => direction.hash(state),
                Op::Slice { starts, limits, .. } => {
                    starts.hash(state);
                    limits.hash(state);
                }
                Op::GetTupleElement { index, .. } => index.hash(state),
                Op::While { condition, body, .. } => {
                    condition.hash_structure(state);
                    body.hash_structure(state);
                }
                _ => {}
            }
        }
    }
}
