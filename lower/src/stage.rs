//! Progress of one lowering call.

use tracing::debug;

/// Steps of a lowering call, in order. There are no backward transitions;
/// a failure abandons the call in the stage it had reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum LoweringStage {
    Start,
    ShapesComputed,
    PlaceholdersBuilt,
    CondTraced,
    BodyTraced,
    Assembled,
    Invoked,
    Done,
}

/// Logs stage transitions for one call.
pub(crate) struct StageTracker<'a> {
    context: &'a str,
    current: LoweringStage,
}

impl<'a> StageTracker<'a> {
    pub(crate) fn new(context: &'a str) -> Self {
        debug!(context, stage = %LoweringStage::Start, "lowering started");
        Self { context, current: LoweringStage::Start }
    }

    pub(crate) fn advance(&mut self, next: LoweringStage) {
        debug_assert!(next > self.current, "stage {next} does not follow {}", self.current);
        debug!(context = self.context, from = %self.current, stage = %next, "lowering stage");
        self.current = next;
    }

    pub(crate) fn current(&self) -> LoweringStage {
        self.current
    }
}
