//! Lyrics engine: CSV input, lyrics lookups, sinks and effect execution.
mod config;
mod genius;
mod language;
mod lookup;
mod lrclib;
mod persist;
mod progress;
mod retry;
mod runner;
mod sink;
mod source;
mod types;

pub use config::{load_config, Backend, ConfigError, RunConfig, DEFAULT_REQUEST_DELAY};
pub use genius::{GeniusLookup, DEFAULT_GENIUS_API_URL};
pub use language::WhatlangDetector;
pub use lookup::{LookupSettings, LyricsLookup};
pub use lrclib::{LrclibLookup, DEFAULT_LRCLIB_URL};
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use progress::{load_progress, persist_progress, ProgressError};
pub use retry::{RetryPolicy, RetryingFetcher, DEFAULT_RETRY_BACKOFF, DEFAULT_RETRY_LIMIT};
pub use runner::{RunError, Runner};
pub use sink::{CsvSink, SinkError, SinkPaths, SinkSet};
pub use source::{load_work_units, SourceError};
pub use types::{FailureKind, LookupError, LyricsMatch, LyricsQuery};
