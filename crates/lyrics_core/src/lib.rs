//! Lyrics core: data model and the pure run-driver state machine.
mod effect;
mod msg;
mod progress;
mod route;
mod state;
mod unit;
mod update;

pub use effect::Effect;
pub use msg::Msg;
pub use progress::ProgressStore;
pub use route::{
    Classifier, FetchResult, LanguageDetector, LanguageRouter, PassThroughClassifier, RejectKind,
    RouteDecision, SinkKind, DEFAULT_MIN_TEXT_LEN, DEFAULT_TARGET_LANGUAGE, LANGUAGE_FIELD,
    LYRICS_FIELD, REASON_ALREADY_PROCESSED, REASON_FIELD, REASON_MISSING_IDENTITY,
    REASON_NOT_FOUND, SOURCE_URL_FIELD,
};
pub use state::{Outcome, Phase, RunState, RunStats, RunSummary, DEFAULT_BATCH_SIZE};
pub use unit::{OutputRow, UnitKey, WorkUnit, ARTIST_FIELD, TRACK_FIELD};
pub use update::update;
