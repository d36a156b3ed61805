use crate::{FetchResult, RouteDecision, RunSummary, WorkUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reporting only; batch boundaries do not affect processing.
    StartBatch {
        number: usize,
        first_index: usize,
        len: usize,
    },
    LogSkip { unit: WorkUnit },
    Fetch { unit: WorkUnit },
    Route { unit: WorkUnit, result: FetchResult },
    Record { decision: RouteDecision },
    PersistProgress,
    Pace,
    Finish(RunSummary),
}
