use std::cell::Cell;

use fori_dtype::DType;
use fori_ir::{Builder, Shape, Value};

use crate::error::{BoxError, Error};
use crate::stage::LoweringStage;
use crate::test::helpers::{increment, less_than, placeholders, s32_1};
use crate::trace::trace;

#[test]
fn test_condition_signature() {
    let (_, ps) = placeholders("loop", &[s32_1(), s32_1()]);
    let cond = trace("cond", less_than, &ps).unwrap();

    assert_eq!(cond.name(), "cond");
    assert_eq!(cond.program_shape().to_string(), "(s32[1], s32[1]) -> pred[]");
    assert!(cond.module().starts_with("HloModule cond\n"), "{}", cond.module());
}

#[test]
fn test_vector_output_is_tuple() {
    let (_, ps) = placeholders("loop", &[s32_1(), s32_1()]);
    let body = trace("body", increment, &ps).unwrap();
    assert_eq!(body.program_shape().result, Shape::tuple([s32_1(), s32_1()]));
}

#[test]
fn test_array_output_is_tuple() {
    let (_, ps) = placeholders("loop", &[s32_1()]);
    let body = trace("body", |s: &[Value]| Ok::<_, fori_ir::Error>([s[0].clone()]), &ps).unwrap();
    assert_eq!(body.program_shape().result, Shape::tuple([s32_1()]));
}

#[test]
fn test_traced_once_in_own_context() {
    let (top, ps) = placeholders("loop", &[s32_1(), s32_1()]);
    let calls = Cell::new(0);
    let cond = trace(
        "cond",
        |s: &[Value]| {
            calls.set(calls.get() + 1);
            assert_ne!(s[0].builder_id(), top.id());
            less_than(s)
        },
        &ps,
    )
    .unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(cond.computation().parameter_count(), 2);
    // The caller's context is untouched.
    assert!(!top.is_finalized());
    assert_eq!(top.parameter_count(), 2);
}

#[test]
fn test_tracing_is_idempotent() {
    let (_, ps) = placeholders("loop", &[s32_1(), s32_1()]);
    let first = trace("body", increment, &ps).unwrap();
    let second = trace("body", increment, &ps).unwrap();

    assert!(first.computation().structurally_eq(second.computation()));
    assert_eq!(first.computation().content_hash(), second.computation().content_hash());
    assert_eq!(first.module(), second.module());
}

#[test]
fn test_user_error_is_tracing_error() {
    let (_, ps) = placeholders("loop", &[s32_1()]);
    let err = trace("cond", |_: &[Value]| Err::<Value, BoxError>("no predicate".into()), &ps).unwrap_err();

    assert!(matches!(&err, Error::Tracing { context, .. } if context == "cond"), "{err}");
    assert!(err.to_string().contains("no predicate"));
    assert_eq!(err.stage(), LoweringStage::PlaceholdersBuilt);
}

#[test]
fn test_ir_error_is_tracing_error() {
    let (_, ps) = placeholders("loop", &[s32_1()]);
    let err = trace(
        "body",
        |s: &[Value]| -> fori_ir::Result<Vec<Value>> {
            let half = s[0].builder().constant_r1(&[0.5f32])?;
            Ok(vec![s[0].add(&half)?])
        },
        &ps,
    )
    .unwrap_err();

    let Error::Tracing { source, .. } = &err else { panic!("expected a tracing error, got {err}") };
    let ir = source.downcast_ref::<fori_ir::Error>().unwrap();
    assert!(matches!(ir, fori_ir::Error::DTypeMismatch { lhs: DType::Int32, rhs: DType::Float32, .. }), "{ir}");
}

#[test]
fn test_foreign_value_is_builder_state_error() {
    let outer = Builder::new("outer");
    let captured = outer.constant_r1(&[1i32]).unwrap();
    let (_, ps) = placeholders("loop", &[s32_1()]);

    let err = trace("body", |s: &[Value]| s[0].add(&captured).map(|v| vec![v]), &ps).unwrap_err();
    assert!(
        matches!(&err, Error::BuilderState { context, source: fori_ir::Error::ForeignValue { .. }, .. } if context == "body"),
        "{err}"
    );
}

#[test]
fn test_returning_caller_placeholder_is_builder_state_error() {
    let (_, ps) = placeholders("loop", &[s32_1()]);
    let leaked = ps[0].value().clone();

    let err = trace("body", |_: &[Value]| Ok::<_, fori_ir::Error>(vec![leaked]), &ps).unwrap_err();
    assert!(matches!(err, Error::BuilderState { .. }), "{err}");
}
