use crate::{OutputRow, WorkUnit};

pub const LYRICS_FIELD: &str = "lyrics";
pub const REASON_FIELD: &str = "reason";
pub const LANGUAGE_FIELD: &str = "language";
pub const SOURCE_URL_FIELD: &str = "source_url";

pub const REASON_NOT_FOUND: &str = "Lyrics not found";
pub const REASON_MISSING_IDENTITY: &str = "Missing track or artist";
pub const REASON_ALREADY_PROCESSED: &str = "Already processed";

pub const DEFAULT_TARGET_LANGUAGE: &str = "eng";
pub const DEFAULT_MIN_TEXT_LEN: usize = 20;

/// Outcome of looking up one unit after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Found {
        lyrics: String,
        source_url: Option<String>,
    },
    NotFound,
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    NotFound,
    FetchFailed,
    InvalidUnit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Accept(OutputRow),
    Reject { row: OutputRow, kind: RejectKind },
    Redirect { row: OutputRow, category: String },
}

impl RouteDecision {
    pub fn row(&self) -> &OutputRow {
        match self {
            RouteDecision::Accept(row) => row,
            RouteDecision::Reject { row, .. } => row,
            RouteDecision::Redirect { row, .. } => row,
        }
    }

    pub fn sink(&self) -> SinkKind {
        match self {
            RouteDecision::Accept(_) => SinkKind::Found,
            RouteDecision::Reject { .. } => SinkKind::Failed,
            RouteDecision::Redirect { .. } => SinkKind::Redirected,
        }
    }

    /// Reject row for a unit that cannot be looked up at all.
    pub fn invalid_unit(unit: &WorkUnit) -> Self {
        RouteDecision::Reject {
            row: OutputRow::from_unit(unit).with(REASON_FIELD, REASON_MISSING_IDENTITY),
            kind: RejectKind::InvalidUnit,
        }
    }
}

/// Output destination categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Found,
    Failed,
    Skipped,
    Redirected,
}

pub trait LanguageDetector: Send + Sync {
    /// Returns an ISO 639-3 code, or `None` when the text is inconclusive.
    fn detect(&self, text: &str) -> Option<String>;
}

pub trait Classifier: Send + Sync {
    fn classify(&self, unit: &WorkUnit, result: FetchResult) -> RouteDecision;
}

/// Accept-on-found, reject-on-not-found-or-error. No content inspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughClassifier;

impl Classifier for PassThroughClassifier {
    fn classify(&self, unit: &WorkUnit, result: FetchResult) -> RouteDecision {
        match result {
            FetchResult::Found { lyrics, source_url } => {
                RouteDecision::Accept(found_row(unit, lyrics, source_url))
            }
            FetchResult::NotFound => not_found(unit),
            FetchResult::Error { message } => fetch_failed(unit, message),
        }
    }
}

/// Routes found lyrics in a foreign language to the redirected sink.
pub struct LanguageRouter {
    detector: Box<dyn LanguageDetector>,
    target_language: String,
    min_text_len: usize,
}

impl LanguageRouter {
    pub fn new(
        detector: Box<dyn LanguageDetector>,
        target_language: impl Into<String>,
        min_text_len: usize,
    ) -> Self {
        Self {
            detector,
            target_language: target_language.into(),
            min_text_len,
        }
    }

    fn detect(&self, lyrics: &str) -> Option<String> {
        // Short text is not reliably classifiable; treat it as unknown.
        if lyrics.trim().chars().count() < self.min_text_len {
            return None;
        }
        self.detector.detect(lyrics)
    }
}

impl Classifier for LanguageRouter {
    fn classify(&self, unit: &WorkUnit, result: FetchResult) -> RouteDecision {
        match result {
            FetchResult::Found { lyrics, source_url } => match self.detect(&lyrics) {
                Some(language) if !language.eq_ignore_ascii_case(&self.target_language) => {
                    RouteDecision::Redirect {
                        row: OutputRow::from_unit(unit).with(LANGUAGE_FIELD, language.clone()),
                        category: language,
                    }
                }
                _ => RouteDecision::Accept(found_row(unit, lyrics, source_url)),
            },
            FetchResult::NotFound => not_found(unit),
            FetchResult::Error { message } => fetch_failed(unit, message),
        }
    }
}

fn found_row(unit: &WorkUnit, lyrics: String, source_url: Option<String>) -> OutputRow {
    let row = OutputRow::from_unit(unit).with(LYRICS_FIELD, lyrics);
    match source_url {
        Some(url) => row.with(SOURCE_URL_FIELD, url),
        None => row,
    }
}

fn not_found(unit: &WorkUnit) -> RouteDecision {
    RouteDecision::Reject {
        row: OutputRow::from_unit(unit).with(REASON_FIELD, REASON_NOT_FOUND),
        kind: RejectKind::NotFound,
    }
}

fn fetch_failed(unit: &WorkUnit, message: String) -> RouteDecision {
    let reason = if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    };
    RouteDecision::Reject {
        row: OutputRow::from_unit(unit).with(REASON_FIELD, reason),
        kind: RejectKind::FetchFailed,
    }
}
