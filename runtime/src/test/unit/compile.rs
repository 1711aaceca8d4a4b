use fori_dtype::DType;
use fori_ir::{Builder, Dim, Shape};

use crate::compile::verify;
use crate::error::Error;
use crate::test::helpers::counting_loop;

#[test]
fn test_verify_counting_loop() {
    verify(&counting_loop("loop")).unwrap();
}

#[test]
fn test_verify_rejects_dynamic_shapes() {
    let b = Builder::new("dynamic");
    let shape = Shape::array_with_dims(DType::Float32, [Dim::Dynamic { bound: Some(4) }]);
    let x = b.parameter(0, shape, "x").unwrap();
    let computation = b.build(&x.abs().unwrap()).unwrap();

    let err = verify(&computation).unwrap_err();
    assert!(matches!(err, Error::Compile { ref computation, .. } if computation == "dynamic"));
}
