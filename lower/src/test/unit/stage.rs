use crate::stage::LoweringStage;

#[test]
fn test_stages_are_ordered() {
    let stages = [
        LoweringStage::Start,
        LoweringStage::ShapesComputed,
        LoweringStage::PlaceholdersBuilt,
        LoweringStage::CondTraced,
        LoweringStage::BodyTraced,
        LoweringStage::Assembled,
        LoweringStage::Invoked,
        LoweringStage::Done,
    ];
    assert!(stages.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_stage_display() {
    assert_eq!(LoweringStage::CondTraced.to_string(), "CondTraced");
    assert_eq!(LoweringStage::Done.to_string(), "Done");
}
