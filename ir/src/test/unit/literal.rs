use fori_dtype::DType;
use proptest::prelude::*;

use crate::error::Error;
use crate::test::generators::arb_literal;
use crate::{ConstValue, Literal, Shape};

#[test]
fn test_scalar_and_vector() {
    let s = Literal::scalar(7i32);
    assert_eq!(s.shape(), Shape::scalar(DType::Int32));
    assert_eq!(s.to_vec::<i32>(), Some(vec![7]));
    assert_eq!(s.to_string(), "7");

    let v = Literal::vector(&[1.5f64, -2.0]);
    assert_eq!(v.shape(), Shape::array(DType::Float64, [2]));
    assert_eq!(v.to_string(), "{1.5, -2.0}");
}

#[test]
fn test_to_vec_checks_dtype() {
    let v = Literal::vector(&[1u8, 2, 3]);
    assert_eq!(v.to_vec::<u8>(), Some(vec![1, 2, 3]));
    assert_eq!(v.to_vec::<i8>(), None);
}

#[test]
fn test_new_truncates_to_width() {
    let l = Literal::new(DType::Int8, [2], vec![ConstValue::Int(200), ConstValue::Int(-1)]).unwrap();
    assert_eq!(l.to_vec::<i8>(), Some(vec![-56, -1]));
}

#[test]
fn test_size_mismatch() {
    let err = Literal::from_slice(&[2, 2], &[1i32, 2, 3]).unwrap_err();
    assert_eq!(err, Error::LiteralSizeMismatch { expected: 4, actual: 3 });
}

#[test]
fn test_filled() {
    let l = Literal::filled(DType::Float32, [2, 2], ConstValue::Int(3));
    assert_eq!(l.to_vec::<f32>(), Some(vec![3.0; 4]));
}

proptest! {
    #[test]
    fn reshape_preserves_values(literal in arb_literal()) {
        let flat = literal.reshaped([literal.element_count()]).unwrap();
        prop_assert_eq!(flat.values(), literal.values());
        prop_assert_eq!(flat.shape().element_count(), Some(literal.element_count()));
    }
}
