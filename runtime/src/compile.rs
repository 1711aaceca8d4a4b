//! Structural verification of computations before execution.
//!
//! Interpreted execution has no code generation step, so "compiling" a
//! computation means proving it is well formed: operands precede their users,
//! parameters are declared once and in range, every shape is static, and every
//! nested WHILE agrees with its condition and body signatures.

use fori_ir::{Computation, Op, Shape};
use snafu::ensure;

use crate::error::{CompileSnafu, Result};

/// Verify `computation` and every computation it calls.
pub fn verify(computation: &Computation) -> Result<()> {
    let name = computation.name();
    let fail = |reason: String| CompileSnafu { computation: name, reason }.fail();
    let count = computation.parameter_count();

    for (id, instr) in computation.instructions().iter().enumerate() {
        ensure!(
            instr.id == id,
            CompileSnafu { computation: name, reason: format!("instruction {id} is numbered %{}", instr.id) }
        );
        if let Some(&src) = instr.op.sources().iter().find(|&&src| src >= id) {
            return fail(format!("%{id} uses %{src}, which does not precede it"));
        }
        if !instr.shape.is_static() {
            return fail(format!("%{id} has dynamic shape {}", instr.shape));
        }
        match &instr.op {
            Op::Parameter { index, .. } if *index >= count => {
                return fail(format!("parameter index {index} out of range for {count} parameters"));
            }
            Op::While { condition, body, init } => {
                let state = &computation.instructions()[*init].shape;
                verify_while(name, state, condition, body)?;
                verify(condition)?;
                verify(body)?;
            }
            _ => {}
        }
    }

    for (index, &id) in computation.parameter_ids().iter().enumerate() {
        let declared = computation.instruction(id).map(|instr| &instr.op);
        if !matches!(declared, Some(Op::Parameter { index: i, .. }) if *i == index) {
            return fail(format!("parameter {index} does not point at a parameter instruction"));
        }
    }
    Ok(())
}

fn verify_while(name: &str, state: &Shape, condition: &Computation, body: &Computation) -> Result<()> {
    let cond_shape = condition.program_shape();
    let body_shape = body.program_shape();
    let checks = [
        ("condition input", cond_shape.parameter_tuple() == *state),
        ("body input", body_shape.parameter_tuple() == *state),
        ("condition output", cond_shape.result.is_scalar_pred()),
        ("body output", body_shape.result == *state),
    ];
    for (part, ok) in checks {
        ensure!(
            ok,
            CompileSnafu {
                computation: name,
                reason: format!(
                    "while {part} signature disagrees with state {state} (condition {cond_shape}, body {body_shape})"
                ),
            }
        );
    }
    Ok(())
}
