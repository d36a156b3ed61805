use crate::{ProgressStore, RejectKind, RouteDecision, WorkUnit};

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Iterating,
    Skipped,
    Fetching,
    Routing,
    Recording,
    Pacing,
    Done,
}

/// Where a processed unit ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NotFound,
    Failed,
    Redirected,
}

impl From<&RouteDecision> for Outcome {
    fn from(decision: &RouteDecision) -> Self {
        match decision {
            RouteDecision::Accept(_) => Outcome::Found,
            RouteDecision::Reject {
                kind: RejectKind::NotFound,
                ..
            } => Outcome::NotFound,
            RouteDecision::Reject { .. } => Outcome::Failed,
            RouteDecision::Redirect { .. } => Outcome::Redirected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub redirected: usize,
    pub skipped: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Found => self.found += 1,
            Outcome::NotFound => self.not_found += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Redirected => self.redirected += 1,
        }
    }

    /// Units that reached a sink during this run (skips excluded).
    pub fn processed(&self) -> usize {
        self.found + self.not_found + self.failed + self.redirected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total_units: usize,
    pub stats: RunStats,
    pub interrupted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub(crate) units: Vec<WorkUnit>,
    pub(crate) progress: ProgressStore,
    pub(crate) cursor: usize,
    pub(crate) phase: Phase,
    pub(crate) stats: RunStats,
    pub(crate) batch_size: usize,
    pub(crate) current_outcome: Option<Outcome>,
    pub(crate) current_fetched: bool,
    pub(crate) stop_requested: bool,
    pub(crate) interrupted: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl RunState {
    pub fn new(batch_size: usize) -> Self {
        Self {
            units: Vec::new(),
            progress: ProgressStore::new(),
            cursor: 0,
            phase: Phase::Loading,
            stats: RunStats::default(),
            batch_size: batch_size.max(1),
            current_outcome: None,
            current_fetched: false,
            stop_requested: false,
            interrupted: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Index of the unit currently being handled.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_unit(&self) -> Option<&WorkUnit> {
        self.units.get(self.cursor)
    }

    pub fn total_units(&self) -> usize {
        self.units.len()
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_units: self.units.len(),
            stats: self.stats,
            interrupted: self.interrupted,
        }
    }
}
