use fori_dtype::DType;
use proptest::prelude::*;
use test_case::test_case;

use crate::test::generators::static_array_shape;
use crate::{Dim, Shape};

#[test_case(Shape::array(DType::Int32, [1]), "s32[1]")]
#[test_case(Shape::scalar(DType::Bool), "pred[]")]
#[test_case(Shape::array(DType::Float32, [2, 3]), "f32[2,3]")]
#[test_case(Shape::array_with_dims(DType::Int32, [Dim::Dynamic { bound: Some(4) }]), "s32[<=4]")]
#[test_case(Shape::array_with_dims(DType::UInt8, [Dim::Static(2), Dim::Dynamic { bound: None }]), "u8[2,?]")]
#[test_case(Shape::tuple([Shape::array(DType::Int32, [1]), Shape::array(DType::Float32, [2, 3])]), "(s32[1], f32[2,3])")]
#[test_case(Shape::tuple(Vec::<Shape>::new()), "()")]
fn test_display(shape: Shape, expected: &str) {
    assert_eq!(shape.to_string(), expected);
}

#[test]
fn test_static_detection() {
    let dynamic = Shape::array_with_dims(DType::Int32, [Dim::Static(2), Dim::Dynamic { bound: Some(8) }]);
    assert!(!dynamic.is_static());
    assert_eq!(dynamic.to_static(), None);
    assert!(!Shape::tuple([Shape::scalar(DType::Bool), dynamic]).is_static());
    assert!(Shape::tuple([Shape::scalar(DType::Bool)]).is_static());
}

#[test]
fn test_scalar_pred() {
    assert!(Shape::scalar(DType::Bool).is_scalar_pred());
    assert!(!Shape::array(DType::Bool, [1]).is_scalar_pred());
    assert!(!Shape::scalar(DType::Int32).is_scalar_pred());
}

proptest! {
    #[test]
    fn static_shapes_report_element_count(shape in static_array_shape()) {
        let dims = shape.to_static().unwrap();
        prop_assert!(shape.is_static());
        prop_assert_eq!(shape.element_count(), Some(dims.iter().product::<usize>()));
        prop_assert_eq!(shape.rank(), Some(dims.len()));
    }
}
