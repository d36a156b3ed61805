use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lyrics_engine::{load_config, Backend, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Lrclib,
    Genius,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Lrclib => Backend::Lrclib,
            BackendArg::Genius => Backend::Genius,
        }
    }
}

/// Fetch lyrics for every track in a CSV file, resumably.
#[derive(Parser, Debug)]
#[command(name = "lyrics_harvester")]
#[command(version)]
pub struct Args {
    /// RON file with run settings; flags below override it
    #[arg(short, long, env = "LYRICS_HARVESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Input CSV with `track` and `artist` columns
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub found_output: Option<PathBuf>,

    #[arg(long)]
    pub failed_output: Option<PathBuf>,

    /// Where lyrics in another language are listed
    #[arg(long)]
    pub redirected_output: Option<PathBuf>,

    /// Also write skipped (already processed) rows to this file
    #[arg(long)]
    pub skip_log: Option<PathBuf>,

    #[arg(long)]
    pub progress_file: Option<PathBuf>,

    /// Attempts per track, including the first
    #[arg(long)]
    pub retry_limit: Option<u32>,

    #[arg(long)]
    pub retry_backoff_ms: Option<u64>,

    /// Pause after each fetched track
    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Lyrics shorter than this are never redirected
    #[arg(long)]
    pub min_text_len: Option<usize>,

    /// ISO 639-3 code of the language to keep (e.g. eng)
    #[arg(long, conflicts_with = "no_language_filter")]
    pub target_language: Option<String>,

    /// Accept found lyrics in any language
    #[arg(long)]
    pub no_language_filter: bool,

    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    #[arg(long, env = "GENIUS_API_TOKEN", hide_env_values = true)]
    pub genius_token: Option<String>,

    /// Append log output to this file as well
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Loads the config file, if any, and applies the flags on top.
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(path) = &self.input {
            config.input = path.clone();
        }
        if let Some(path) = &self.found_output {
            config.found_output = path.clone();
        }
        if let Some(path) = &self.failed_output {
            config.failed_output = path.clone();
        }
        if let Some(path) = &self.redirected_output {
            config.redirected_output = path.clone();
        }
        if let Some(path) = &self.skip_log {
            config.skipped_output = Some(path.clone());
        }
        if let Some(path) = &self.progress_file {
            config.progress_file = path.clone();
        }
        if let Some(limit) = self.retry_limit {
            config.retry_limit = limit;
        }
        if let Some(backoff) = self.retry_backoff_ms {
            config.retry_backoff_ms = backoff;
        }
        if let Some(delay) = self.delay_ms {
            config.request_delay_ms = delay;
        }
        if let Some(size) = self.batch_size {
            config.batch_size = size;
        }
        if let Some(len) = self.min_text_len {
            config.min_text_len = len;
        }
        if let Some(language) = &self.target_language {
            config.target_language = Some(language.clone());
        }
        if self.no_language_filter {
            config.target_language = None;
        }
        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if let Some(token) = &self.genius_token {
            config.genius_token = Some(token.clone());
        }
        config
    }
}
