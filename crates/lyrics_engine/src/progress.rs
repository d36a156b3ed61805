use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lyrics_core::ProgressStore;
use lyrics_logging::lyrics_info;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("cannot read progress file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("progress file {path:?} is corrupt ({message}); refusing to start over")]
    Corrupt { path: PathBuf, message: String },
    #[error("cannot serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write progress file: {0}")]
    Persist(#[from] PersistError),
}

/// Loads the resume ledger. A missing file is a first run, not an error.
pub fn load_progress(path: &Path) -> Result<ProgressStore, ProgressError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            lyrics_info!("No progress file at {:?}; starting fresh", path);
            return Ok(ProgressStore::new());
        }
        Err(source) => {
            return Err(ProgressError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let store: ProgressStore =
        serde_json::from_str(&content).map_err(|err| ProgressError::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    lyrics_info!(
        "Loaded progress from {:?}: {} units already processed",
        path,
        store.done_count()
    );
    Ok(store)
}

/// Rewrites the whole ledger. Called once per unit.
pub fn persist_progress(store: &ProgressStore, path: &Path) -> Result<(), ProgressError> {
    let content = serde_json::to_string_pretty(store)?;
    AtomicFileWriter::new(path.to_path_buf()).write(&content)?;
    Ok(())
}
