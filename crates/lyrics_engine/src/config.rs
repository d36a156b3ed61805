use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lyrics_core::{
    Classifier, LanguageRouter, PassThroughClassifier, DEFAULT_BATCH_SIZE, DEFAULT_MIN_TEXT_LEN,
    DEFAULT_TARGET_LANGUAGE,
};
use serde::Deserialize;
use thiserror::Error;

use crate::genius::{GeniusLookup, DEFAULT_GENIUS_API_URL};
use crate::language::WhatlangDetector;
use crate::lookup::{LookupSettings, LyricsLookup};
use crate::lrclib::{LrclibLookup, DEFAULT_LRCLIB_URL};
use crate::retry::{RetryPolicy, DEFAULT_RETRY_BACKOFF, DEFAULT_RETRY_LIMIT};
use crate::sink::SinkPaths;
use crate::LookupError;

pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("the genius backend needs an API token (GENIUS_API_TOKEN)")]
    MissingToken,
    #[error("cannot set up lookup client: {0}")]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Lrclib,
    Genius,
}

/// Everything a run needs. Durations are stored in milliseconds so the RON
/// file stays plain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub found_output: PathBuf,
    pub failed_output: PathBuf,
    pub redirected_output: PathBuf,
    pub skipped_output: Option<PathBuf>,
    pub progress_file: PathBuf,
    pub retry_limit: u32,
    pub retry_backoff_ms: u64,
    pub request_delay_ms: u64,
    pub batch_size: usize,
    pub min_text_len: usize,
    /// ISO 639-3 code; `None` disables language routing.
    pub target_language: Option<String>,
    pub backend: Backend,
    pub lrclib_url: String,
    pub genius_api_url: String,
    pub genius_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let lookup = LookupSettings::default();
        Self {
            input: PathBuf::from("tracks.csv"),
            found_output: PathBuf::from("lyrics_found.csv"),
            failed_output: PathBuf::from("lyrics_failed.csv"),
            redirected_output: PathBuf::from("lyrics_foreign.csv"),
            skipped_output: None,
            progress_file: PathBuf::from("progress.json"),
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF.as_millis() as u64,
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            batch_size: DEFAULT_BATCH_SIZE,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            target_language: Some(DEFAULT_TARGET_LANGUAGE.to_string()),
            backend: Backend::default(),
            lrclib_url: DEFAULT_LRCLIB_URL.to_string(),
            genius_api_url: DEFAULT_GENIUS_API_URL.to_string(),
            genius_token: None,
            connect_timeout_ms: lookup.connect_timeout.as_millis() as u64,
            request_timeout_ms: lookup.request_timeout.as_millis() as u64,
            user_agent: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_limit == 0 {
            return Err(ConfigError::Invalid("retry_limit must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.backend == Backend::Genius && self.genius_token().is_none() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            limit: self.retry_limit,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn sink_paths(&self) -> SinkPaths {
        SinkPaths {
            found: self.found_output.clone(),
            failed: self.failed_output.clone(),
            redirected: self.redirected_output.clone(),
            skipped: self.skipped_output.clone(),
        }
    }

    pub fn lookup_settings(&self) -> LookupSettings {
        let defaults = LookupSettings::default();
        LookupSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    pub fn build_lookup(&self) -> Result<Arc<dyn LyricsLookup>, ConfigError> {
        let settings = self.lookup_settings();
        let lookup: Arc<dyn LyricsLookup> = match self.backend {
            Backend::Lrclib => Arc::new(LrclibLookup::new(&self.lrclib_url, &settings)?),
            Backend::Genius => {
                let token = self.genius_token().ok_or(ConfigError::MissingToken)?;
                Arc::new(GeniusLookup::new(&self.genius_api_url, token, &settings)?)
            }
        };
        Ok(lookup)
    }

    pub fn build_classifier(&self) -> Box<dyn Classifier> {
        match self.target_language.as_deref().map(str::trim) {
            Some(language) if !language.is_empty() => Box::new(LanguageRouter::new(
                Box::new(WhatlangDetector),
                language,
                self.min_text_len,
            )),
            _ => Box::new(PassThroughClassifier),
        }
    }

    fn genius_token(&self) -> Option<&str> {
        self.genius_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Reads a RON config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
