use fori_dtype::DType;
use fori_ir::{Builder, Shape};

use crate::error::Error;
use crate::placeholder::make_parameters;
use crate::stage::LoweringStage;
use crate::test::helpers::s32_1;

#[test]
fn test_one_parameter_per_shape() {
    let builder = Builder::new("loop");
    let shapes = [s32_1(), Shape::array(DType::Float32, [2, 2]), Shape::scalar(DType::Bool)];
    let placeholders = make_parameters(&builder, &shapes).unwrap();

    assert_eq!(placeholders.len(), 3);
    assert_eq!(builder.parameter_count(), 3);
    for (i, placeholder) in placeholders.iter().enumerate() {
        assert_eq!(placeholder.index(), i);
        assert_eq!(placeholder.shape(), &shapes[i]);
        assert_eq!(placeholder.value().shape(), &shapes[i]);
        assert_eq!(placeholder.value().builder_id(), builder.id());
    }
}

#[test]
fn test_parameters_named_by_position() {
    let builder = Builder::new("loop");
    let placeholders = make_parameters(&builder, &[s32_1(), s32_1()]).unwrap();
    let computation = builder.build_tuple(&[placeholders[0].value().clone(), placeholders[1].value().clone()]).unwrap();
    let module = computation.to_module();
    assert!(module.contains("name=\"p0\""), "{module}");
    assert!(module.contains("name=\"p1\""), "{module}");
}

#[test]
fn test_finalized_context_rejected() {
    let builder = Builder::new("done");
    let x = builder.parameter(0, s32_1(), "x").unwrap();
    builder.build(&x).unwrap();

    let err = make_parameters(&builder, &[s32_1()]).unwrap_err();
    assert!(
        matches!(&err, Error::BuilderState { context, source: fori_ir::Error::BuilderFinalized { .. }, .. } if context == "done"),
        "{err}"
    );
    assert_eq!(err.stage(), LoweringStage::ShapesComputed);
}

#[test]
fn test_taken_index_rejected() {
    let builder = Builder::new("busy");
    builder.parameter(0, s32_1(), "x").unwrap();

    let err = make_parameters(&builder, &[s32_1()]).unwrap_err();
    assert!(
        matches!(err, Error::BuilderState { source: fori_ir::Error::DuplicateParameter { index: 0, .. }, .. }),
        "{err}"
    );
}
