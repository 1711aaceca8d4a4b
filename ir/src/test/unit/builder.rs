use std::sync::Arc;

use fori_dtype::DType;
use test_case::test_case;

use crate::error::Error;
use crate::{Builder, Computation, Op, Shape};

fn s32(dims: &[usize]) -> Shape {
    Shape::array(DType::Int32, dims.iter().copied())
}

/// `(p0 < p1)` over two `s32[1]` parameters.
fn less_than(name: &str) -> Computation {
    let b = Builder::new(name);
    let p0 = b.parameter(0, s32(&[1]), "p0").unwrap();
    let p1 = b.parameter(1, s32(&[1]), "p1").unwrap();
    let lt = p0.lt(&p1).unwrap().reshape(&[]).unwrap();
    b.build(&lt).unwrap()
}

/// `(p0 + 1, p1)` over two `s32[1]` parameters.
fn increment(name: &str) -> Computation {
    let b = Builder::new(name);
    let p0 = b.parameter(0, s32(&[1]), "p0").unwrap();
    let p1 = b.parameter(1, s32(&[1]), "p1").unwrap();
    let one = b.constant_r1(&[1i32]).unwrap();
    let next = p0.add(&one).unwrap();
    b.build_tuple(&[next, p1.copy().unwrap()]).unwrap()
}

#[test]
fn test_parameters_and_binary_op() {
    let b = Builder::new("add");
    let x = b.parameter(0, s32(&[2, 3]), "x").unwrap();
    let y = b.parameter(1, s32(&[2, 3]), "y").unwrap();
    let sum = x.add(&y).unwrap();
    assert_eq!(sum.shape(), &s32(&[2, 3]));

    let computation = b.build(&sum).unwrap();
    assert_eq!(computation.name(), "add");
    assert_eq!(computation.parameter_count(), 2);
    let shape = computation.program_shape();
    assert_eq!(shape.parameters, vec![s32(&[2, 3]), s32(&[2, 3])]);
    assert_eq!(shape.result, s32(&[2, 3]));
    assert!(matches!(computation.root().op, Op::Binary(..)));
}

#[test]
fn test_parameters_declared_out_of_order() {
    let b = Builder::new("swap");
    let second = b.parameter(1, Shape::scalar(DType::Float32), "b").unwrap();
    let first = b.parameter(0, Shape::scalar(DType::Int8), "a").unwrap();
    let computation = b.build_tuple(&[second, first]).unwrap();

    let shape = computation.program_shape();
    assert_eq!(shape.parameters, vec![Shape::scalar(DType::Int8), Shape::scalar(DType::Float32)]);
    assert_eq!(shape.result, Shape::tuple([Shape::scalar(DType::Float32), Shape::scalar(DType::Int8)]));
}

#[test]
fn test_build_drops_dead_instructions_but_keeps_parameters() {
    let b = Builder::new("dead");
    let x = b.parameter(0, s32(&[1]), "x").unwrap();
    let unused = b.parameter(1, s32(&[1]), "unused").unwrap();
    let _dead = unused.neg().unwrap();
    let c = b.constant_r1(&[7i32]).unwrap();
    let root = x.mul(&c).unwrap();

    let computation = b.build(&root).unwrap();
    assert_eq!(computation.parameter_count(), 2);
    assert_eq!(computation.instructions().len(), 4);
    assert!(computation.instructions().iter().all(|i| !matches!(i.op, Op::Unary(..))));
    for (id, instr) in computation.instructions().iter().enumerate() {
        assert_eq!(instr.id, id);
        assert!(instr.op.sources().iter().all(|&src| src < id));
    }
}

#[test]
fn test_duplicate_parameter() {
    let b = Builder::new("dup");
    b.parameter(0, s32(&[1]), "a").unwrap();
    let err = b.parameter(0, s32(&[1]), "b").unwrap_err();
    assert_eq!(err, Error::DuplicateParameter { builder: "dup".into(), index: 0 });
}

#[test]
fn test_parameter_gap() {
    let b = Builder::new("gap");
    let p = b.parameter(1, s32(&[1]), "p1").unwrap();
    let err = b.build(&p).unwrap_err();
    assert_eq!(err, Error::ParameterGap { builder: "gap".into(), missing: 0 });
    assert!(!b.is_finalized());
}

#[test]
fn test_finalized_builder_rejects_further_use() {
    let b = Builder::new("sealed");
    let p = b.parameter(0, s32(&[1]), "p").unwrap();
    b.build(&p).unwrap();
    assert!(b.is_finalized());

    assert!(matches!(p.add(&p), Err(Error::BuilderFinalized { .. })));
    assert!(matches!(b.constant_r0(1i32), Err(Error::BuilderFinalized { .. })));
    assert!(matches!(b.parameter(1, s32(&[1]), "q"), Err(Error::BuilderFinalized { .. })));
    assert!(matches!(b.build(&p), Err(Error::BuilderFinalized { .. })));
}

#[test]
fn test_foreign_value_rejected() {
    let a = Builder::new("a");
    let b = Builder::new("b");
    let x = a.parameter(0, s32(&[1]), "x").unwrap();
    let y = b.parameter(0, s32(&[1]), "y").unwrap();

    let err = y.add(&x).unwrap_err();
    assert!(err.is_builder_misuse());
    assert!(matches!(err, Error::ForeignValue { owner, builder_id, .. } if owner == a.id() && builder_id == b.id()));
    assert!(matches!(b.tuple(&[x.clone()]), Err(Error::ForeignValue { .. })));
    assert!(matches!(b.build(&x), Err(Error::ForeignValue { .. })));
}

#[test]
fn test_builder_ids_are_unique() {
    let a = Builder::new("same");
    let b = Builder::new("same");
    assert_ne!(a.id(), b.id());
}

#[test_case(DType::Float32, DType::Float32, &[2], &[3]; "dims differ")]
#[test_case(DType::Float32, DType::Int32, &[2], &[2]; "dtypes differ")]
fn test_binary_operands_must_match(lhs_dtype: DType, rhs_dtype: DType, lhs: &[usize], rhs: &[usize]) {
    let b = Builder::new("mismatch");
    let x = b.parameter(0, Shape::array(lhs_dtype, lhs.iter().copied()), "x").unwrap();
    let y = b.parameter(1, Shape::array(rhs_dtype, rhs.iter().copied()), "y").unwrap();
    let err = x.sub(&y).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. } | Error::DTypeMismatch { .. }));
    assert!(!err.is_builder_misuse());
}

#[test]
fn test_dtype_rules() {
    let b = Builder::new("dtypes");
    let f = b.constant_r0(1.5f32).unwrap();
    let p = b.constant_r0(true).unwrap();
    let i = b.constant_r0(3u8).unwrap();

    assert!(matches!(f.and(&f), Err(Error::InvalidDTypeForBinaryOp { .. })));
    assert!(matches!(p.add(&p), Err(Error::InvalidDTypeForBinaryOp { .. })));
    assert!(matches!(p.neg(), Err(Error::InvalidDTypeForUnaryOp { .. })));
    assert!(matches!(f.not(), Err(Error::InvalidDTypeForUnaryOp { .. })));
    assert!(p.and(&p).is_ok());
    assert!(p.max(&p).is_ok());
    assert!(i.or(&i).is_ok());
    assert!(i.not().is_ok());
}

#[test]
fn test_compare_produces_pred() {
    let b = Builder::new("cmp");
    let x = b.parameter(0, Shape::array(DType::Float64, [4]), "x").unwrap();
    let y = b.parameter(1, Shape::array(DType::Float64, [4]), "y").unwrap();
    let ge = x.ge(&y).unwrap();
    assert_eq!(ge.shape(), &Shape::array(DType::Bool, [4]));
}

#[test]
fn test_select() {
    let b = Builder::new("select");
    let x = b.parameter(0, s32(&[3]), "x").unwrap();
    let y = b.parameter(1, s32(&[3]), "y").unwrap();
    let pred = x.gt(&y).unwrap();
    assert_eq!(pred.select(&x, &y).unwrap().shape(), &s32(&[3]));

    let scalar = b.constant_r0(false).unwrap();
    assert!(scalar.select(&x, &y).is_ok());
    assert!(matches!(x.select(&x, &y), Err(Error::SelectPredicateNotBool { .. })));
}

#[test]
fn test_shape_ops() {
    let b = Builder::new("shapes");
    let x = b.parameter(0, s32(&[2, 3]), "x").unwrap();

    assert_eq!(x.reshape(&[6]).unwrap().shape(), &s32(&[6]));
    assert!(matches!(
        x.reshape(&[4]),
        Err(Error::ReshapeSizeMismatch { input_size: 6, output_size: 4 })
    ));

    let s = x.slice(&[0, 1], &[2, 3]).unwrap();
    assert_eq!(s.shape(), &s32(&[2, 2]));
    assert!(matches!(x.slice(&[0, 2], &[2, 4]), Err(Error::SliceOutOfBounds { dim: 1, .. })));
    assert!(matches!(x.slice(&[0], &[1]), Err(Error::SliceRankMismatch { .. })));

    let c = b.constant_r0(5i32).unwrap();
    assert_eq!(c.broadcast(&[2, 3]).unwrap().shape(), &s32(&[2, 3]));
    assert!(matches!(x.broadcast(&[2, 3]), Err(Error::BroadcastRequiresScalar { .. })));

    let v = b.constant_r1(&[1i32, 2, 3]).unwrap();
    assert_eq!(v.index(2).unwrap().shape(), &s32(&[]));
    assert!(matches!(v.index(3), Err(Error::SliceOutOfBounds { .. })));
    assert_eq!(x.convert(DType::Float32).unwrap().shape(), &Shape::array(DType::Float32, [2, 3]));
}

#[test]
fn test_index_requires_rank_one() {
    let b = Builder::new("index");
    let x = b.parameter(0, s32(&[2, 3]), "x").unwrap();
    assert_eq!(x.index(0).unwrap_err(), Error::SliceRankMismatch { rank: 2, starts: 1, limits: 1 });
}

#[test]
fn test_index_at_usize_max() {
    let b = Builder::new("index");
    let v = b.constant_r1(&[1i32, 2, 3]).unwrap();
    assert_eq!(
        v.index(usize::MAX).unwrap_err(),
        Error::SliceOutOfBounds { dim: 0, start: usize::MAX, limit: usize::MAX, size: 3 }
    );
}

#[test]
fn test_dynamic_shape_rejected_by_reshape() {
    let b = Builder::new("dyn");
    let shape = Shape::array_with_dims(DType::Int32, [crate::Dim::Dynamic { bound: Some(4) }]);
    let x = b.parameter(0, shape, "x").unwrap();
    assert!(matches!(x.reshape(&[4]), Err(Error::DynamicShapeUnsupported { .. })));
}

#[test]
fn test_tuple_and_get_tuple_element() {
    let b = Builder::new("tuple");
    let x = b.parameter(0, s32(&[1]), "x").unwrap();
    let y = b.parameter(1, Shape::scalar(DType::Bool), "y").unwrap();
    let t = b.tuple(&[x, y]).unwrap();
    assert_eq!(t.shape(), &Shape::tuple([s32(&[1]), Shape::scalar(DType::Bool)]));
    assert_eq!(t.get_tuple_element(1).unwrap().shape(), &Shape::scalar(DType::Bool));
    assert!(matches!(t.get_tuple_element(2), Err(Error::TupleIndexOutOfBounds { index: 2, .. })));

    let z = b.constant_r0(1i32).unwrap();
    assert!(matches!(z.get_tuple_element(0), Err(Error::ExpectedTuple { .. })));
}

#[test]
fn test_while_loop() {
    let cond = Arc::new(less_than("cond"));
    let body = Arc::new(increment("body"));

    let b = Builder::new("loop");
    let p0 = b.parameter(0, s32(&[1]), "p0").unwrap();
    let p1 = b.parameter(1, s32(&[1]), "p1").unwrap();
    let init = b.tuple(&[p0, p1]).unwrap();
    let w = b.while_loop(cond, body, &init).unwrap();
    assert_eq!(w.shape(), init.shape());

    let computation = b.build(&w).unwrap();
    assert!(matches!(computation.root().op, Op::While { .. }));
    assert_eq!(computation.called_computations().count(), 2);
}

#[test]
fn test_while_loop_requires_tuple_init() {
    let b = Builder::new("loop");
    let p0 = b.parameter(0, s32(&[1]), "p0").unwrap();
    let err = b.while_loop(Arc::new(less_than("c")), Arc::new(increment("b")), &p0).unwrap_err();
    assert!(matches!(err, Error::ExpectedTuple { .. }));
}

#[test]
fn test_while_loop_signature_checks() {
    let b = Builder::new("loop");
    let p0 = b.parameter(0, s32(&[1]), "p0").unwrap();
    let p1 = b.parameter(1, s32(&[1]), "p1").unwrap();
    let init = b.tuple(&[p0.clone(), p1]).unwrap();

    // Condition over a single parameter.
    let narrow = Builder::new("narrow");
    let q = narrow.parameter(0, s32(&[1]), "q").unwrap();
    let narrow_cond = narrow.build(&q.eq(&q).unwrap().reshape(&[]).unwrap()).unwrap();
    let err = b.while_loop(Arc::new(narrow_cond), Arc::new(increment("body")), &init).unwrap_err();
    assert!(matches!(err, Error::WhileSignatureMismatch { part: "condition input", .. }));

    // Condition producing pred[1] instead of pred[].
    let wide = Builder::new("wide");
    let w0 = wide.parameter(0, s32(&[1]), "p0").unwrap();
    let w1 = wide.parameter(1, s32(&[1]), "p1").unwrap();
    let wide_cond = wide.build(&w0.lt(&w1).unwrap()).unwrap();
    let err = b.while_loop(Arc::new(wide_cond), Arc::new(increment("body")), &init).unwrap_err();
    assert!(matches!(err, Error::WhileSignatureMismatch { part: "condition output", .. }));

    // Body dropping an element.
    let short = Builder::new("short");
    let s0 = short.parameter(0, s32(&[1]), "p0").unwrap();
    short.parameter(1, s32(&[1]), "p1").unwrap();
    let short_body = short.build_tuple(&[s0]).unwrap();
    let err = b.while_loop(Arc::new(less_than("cond")), Arc::new(short_body), &init).unwrap_err();
    assert!(matches!(err, Error::WhileSignatureMismatch { part: "body output", .. }));
}
