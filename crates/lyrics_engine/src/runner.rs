use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lyrics_core::{
    update, Classifier, Effect, Msg, ProgressStore, RejectKind, RouteDecision, RunState,
    RunSummary, WorkUnit, ARTIST_FIELD, REASON_FIELD, TRACK_FIELD,
};
use lyrics_logging::{lyrics_debug, lyrics_error, lyrics_info, lyrics_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, RunConfig};
use crate::progress::{load_progress, persist_progress, ProgressError};
use crate::retry::RetryingFetcher;
use crate::sink::{SinkError, SinkSet};
use crate::source::{load_work_units, SourceError};

/// Errors that abort the whole run. Per-unit lookup failures never surface
/// here; they are routed to the failed sink instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Executes the effects of the core state machine, one unit at a time.
pub struct Runner {
    fetcher: RetryingFetcher,
    classifier: Box<dyn Classifier>,
    sinks: SinkSet,
    progress_path: PathBuf,
    request_delay: Duration,
    batch_size: usize,
    cancel: CancellationToken,
}

impl Runner {
    pub fn new(
        fetcher: RetryingFetcher,
        classifier: Box<dyn Classifier>,
        sinks: SinkSet,
        progress_path: impl Into<PathBuf>,
        request_delay: Duration,
        batch_size: usize,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            sinks,
            progress_path: progress_path.into(),
            request_delay,
            batch_size,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fetcher = RetryingFetcher::new(config.build_lookup()?, config.retry_policy());
        Ok(Self::new(
            fetcher,
            config.build_classifier(),
            SinkSet::new(&config.sink_paths()),
            config.progress_file.clone(),
            config.request_delay(),
            config.batch_size,
        ))
    }

    /// Cancelling this token stops the run at the next safe point.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Loads the input and the progress ledger, then processes every unit.
    pub async fn run(&mut self, input: &Path) -> Result<RunSummary, RunError> {
        let units = load_work_units(input)?;
        let progress = load_progress(&self.progress_path)?;
        self.drive(units, progress).await
    }

    pub async fn drive(
        &mut self,
        units: Vec<WorkUnit>,
        progress: ProgressStore,
    ) -> Result<RunSummary, RunError> {
        let (mut state, effects) = update(
            RunState::new(self.batch_size),
            Msg::Loaded { units, progress },
        );
        let mut pending: VecDeque<Effect> = effects.into();

        let mut stop_sent = false;

        while let Some(effect) = pending.pop_front() {
            if let Effect::Finish(summary) = effect {
                log_summary(&summary);
                return Ok(summary);
            }
            if let Some(msg) = self.execute(&state, effect).await? {
                stop_sent |= msg == Msg::StopRequested;
                state = apply(state, msg, &mut pending);
            }
            if self.cancel.is_cancelled() && !stop_sent {
                lyrics_warn!("Stop requested; finishing the current unit");
                stop_sent = true;
                state = apply(state, Msg::StopRequested, &mut pending);
            }
        }

        lyrics_error!("Run stopped in phase {:?} without finishing", state.phase());
        Ok(state.summary())
    }

    async fn execute(&mut self, state: &RunState, effect: Effect) -> Result<Option<Msg>, RunError> {
        let msg = match effect {
            Effect::StartBatch {
                number,
                first_index,
                len,
            } => {
                lyrics_info!(
                    "Processing batch {} ({} units from #{} of {})",
                    number,
                    len,
                    first_index + 1,
                    state.total_units()
                );
                None
            }
            Effect::LogSkip { unit } => {
                lyrics_info!("Skipped (already processed): {} - {}", unit.track(), unit.artist());
                self.sinks.log_skip(&unit)?;
                Some(Msg::SkipLogged)
            }
            Effect::Fetch { unit } => {
                lyrics_debug!(
                    "Fetching #{}: {} - {}",
                    state.cursor() + 1,
                    unit.track(),
                    unit.artist()
                );
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Some(Msg::StopRequested),
                    result = self.fetcher.fetch(&unit) => Some(Msg::FetchFinished(result)),
                }
            }
            Effect::Route { unit, result } => {
                Some(Msg::Routed(self.classifier.classify(&unit, result)))
            }
            Effect::Record { decision } => {
                self.sinks.record(&decision)?;
                log_decision(&decision);
                Some(Msg::Recorded)
            }
            Effect::PersistProgress => {
                persist_progress(state.progress(), &self.progress_path)?;
                Some(Msg::ProgressPersisted)
            }
            Effect::Pace => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Some(Msg::StopRequested),
                    _ = tokio::time::sleep(self.request_delay) => Some(Msg::Paced),
                }
            }
            Effect::Finish(_) => None,
        };

        Ok(msg)
    }
}

fn apply(state: RunState, msg: Msg, pending: &mut VecDeque<Effect>) -> RunState {
    let (next, effects) = update(state, msg);
    pending.extend(effects);
    next
}

fn log_decision(decision: &RouteDecision) {
    let row = decision.row();
    let track = row.get(TRACK_FIELD).unwrap_or_default();
    let artist = row.get(ARTIST_FIELD).unwrap_or_default();
    match decision {
        RouteDecision::Accept(_) => lyrics_info!("Saved lyrics: {} - {}", track, artist),
        RouteDecision::Redirect { category, .. } => {
            lyrics_info!("Other language ({}): {} - {}", category, track, artist)
        }
        RouteDecision::Reject { kind, .. } => {
            let reason = row.get(REASON_FIELD).unwrap_or_default();
            match kind {
                RejectKind::NotFound => lyrics_warn!("Not found: {} - {}", track, artist),
                RejectKind::FetchFailed | RejectKind::InvalidUnit => {
                    lyrics_warn!("Failed: {} - {} ({})", track, artist, reason)
                }
            }
        }
    }
}

fn log_summary(summary: &RunSummary) {
    let stats = summary.stats;
    if summary.interrupted {
        lyrics_warn!("Run interrupted; progress saved, rerun to resume");
    }
    lyrics_info!(
        "Finished: {} found, {} not found, {} failed, {} other language, {} skipped ({} units in input)",
        stats.found,
        stats.not_found,
        stats.failed,
        stats.redirected,
        stats.skipped,
        summary.total_units
    );
}
