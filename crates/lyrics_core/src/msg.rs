#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Input rows and the persisted progress ledger are in memory.
    Loaded {
        units: Vec<crate::WorkUnit>,
        progress: crate::ProgressStore,
    },
    /// The skip record for an already-done unit was handled.
    SkipLogged,
    /// The retrying fetcher finished with the current unit.
    FetchFinished(crate::FetchResult),
    /// The classifier picked a destination for the current unit.
    Routed(crate::RouteDecision),
    /// The routed row is durably in its sink.
    Recorded,
    /// The progress ledger was flushed to disk.
    ProgressPersisted,
    /// The inter-request delay elapsed.
    Paced,
    /// Operator asked the run to stop (Ctrl-C).
    StopRequested,
}
