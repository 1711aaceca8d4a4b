//! Text form of a computation.
//!
//! ```text
//! HloModule fused_while
//!
//! %condcomputation (p0: s32[1], p1: s32[1]) -> pred[] {
//!   ...
//! }
//!
//! ENTRY %fused_while (p0: s32[1], p1: s32[1]) -> (s32[1], s32[1]) {
//!   %0 = s32[1] parameter(0), name="p0"
//!   %1 = s32[1] parameter(1), name="p1"
//!   %2 = (s32[1], s32[1]) tuple(%0, %1)
//!   ROOT %3 = (s32[1], s32[1]) while(%2), condition=%condcomputation, body=%bodycomputation
//! }
//! ```
//!
//! Nested computations are printed before their callers, so the entry
//! computation always comes last.

use std::collections::HashSet;
use std::fmt::Write;

use crate::computation::Computation;
use crate::op::{Instruction, Op};

impl Computation {
    /// Serialize this computation and everything it calls as a text module.
    pub fn to_module(&self) -> String {
        let mut out = format!("HloModule {}\n", self.name());
        let mut seen = HashSet::new();
        for called in self.called_computations() {
            write_nested(called, &mut seen, &mut out);
        }
        out.push('\n');
        write_computation(self, "ENTRY ", &mut out);
        out
    }
}

fn write_nested(computation: &Computation, seen: &mut HashSet<*const Computation>, out: &mut String) {
    if !seen.insert(computation as *const Computation) {
        return;
    }
    for called in computation.called_computations() {
        write_nested(called, seen, out);
    }
    out.push('\n');
    write_computation(computation, "", out);
}

fn write_computation(computation: &Computation, prefix: &str, out: &mut String) {
    let shape = computation.program_shape();
    let params = shape
        .parameters
        .iter()
        .enumerate()
        .map(|(i, s)| format!("p{i}: {s}"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "{prefix}%{} ({params}) -> {} {{", computation.name(), shape.result);
    for instr in computation.instructions() {
        let root = if instr.id == computation.root_id() { "ROOT " } else { "" };
        let _ = writeln!(out, "  {root}{}", format_instruction(instr));
    }
    out.push_str("}\n");
}

pub(crate) fn format_instruction(instr: &Instruction) -> String {
    let operands = instr.op.sources().iter().map(|id| format!("%{id}")).collect::<Vec<_>>().join(", ");
    let head = format!("%{} = {} {}", instr.id, instr.shape, instr.op.opcode());
    match &instr.op {
        Op::Parameter { index, name } => format!("{head}({index}), name=\"{name}\""),
        Op::Constant(literal) => format!("{head}({literal})"),
        Op::Compare(direction, ..) => format!("{head}({operands}), direction={direction}"),
        Op::Slice { starts, limits, .. } => {
            let ranges = starts.iter().zip(limits).map(|(s, l)| format!("[{s}:{l}]")).collect::<Vec<_>>().join(", ");
            format!("{head}({operands}), slice={{{ranges}}}")
        }
        Op::GetTupleElement { index, .. } => format!("{head}({operands}), index={index}"),
        Op::While { condition, body, .. } => {
            format!("{head}({operands}), condition=%{}, body=%{}", condition.name(), body.name())
        }
        _ => format!("{head}({operands})"),
    }
}
