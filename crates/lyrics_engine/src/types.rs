use std::fmt;

use lyrics_core::WorkUnit;

/// What a lookup backend is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub track: String,
    pub artist: String,
}

impl LyricsQuery {
    pub fn new(track: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            track: track.into(),
            artist: artist.into(),
        }
    }

    pub fn from_unit(unit: &WorkUnit) -> Self {
        Self::new(unit.track().trim(), unit.artist().trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsMatch {
    pub lyrics: String,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct LookupError {
    pub kind: FailureKind,
    pub message: String,
}

impl LookupError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
