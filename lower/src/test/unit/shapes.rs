use fori_dtype::{DType, DeviceSpec};
use fori_ir::Shape;
use fori_tensor::Tensor;
use test_case::test_case;

use crate::error::Error;
use crate::shapes::shapes_of;
use crate::stage::LoweringStage;

#[test]
fn test_static_shapes_in_order() {
    let operands = [
        Tensor::from_slice(&[0i32]),
        Tensor::from_shape_vec(DeviceSpec::Cpu, &[2, 3], &[0.5f32; 6]).unwrap(),
        Tensor::scalar(true),
    ];
    let shapes = shapes_of(&operands).unwrap();
    assert_eq!(
        shapes,
        vec![Shape::array(DType::Int32, [1]), Shape::array(DType::Float32, [2, 3]), Shape::scalar(DType::Bool)]
    );
}

#[test]
fn test_no_operands() {
    assert!(shapes_of::<Tensor>(&[]).unwrap().is_empty());
}

#[test]
fn test_shapes_of_borrowed() {
    let a = Tensor::from_slice(&[1u8, 2]);
    let shapes = shapes_of(&[&a]).unwrap();
    assert_eq!(shapes, vec![Shape::array(DType::UInt8, [2])]);
}

#[test_case(None ; "unbounded")]
#[test_case(Some(8) ; "bounded")]
fn test_dynamic_dimension_rejected(bound: Option<usize>) {
    let operands = [Tensor::from_slice(&[0i32]), Tensor::from_slice(&[1i32, 2, 3]).with_dynamic_dim(0, bound).unwrap()];
    let err = shapes_of(&operands).unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape { index: 1, .. }), "{err}");
    assert_eq!(err.stage(), LoweringStage::Start);
}
