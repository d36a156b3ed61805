use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use lyrics_core::{OutputRow, RouteDecision, SinkKind, WorkUnit, REASON_ALREADY_PROCESSED, REASON_FIELD};
use thiserror::Error;

use crate::persist::{ensure_parent_dir, PersistError};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("row columns {found:?} do not match header {expected:?} of {path:?}")]
    ColumnMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("cannot prepare output location: {0}")]
    Persist(#[from] PersistError),
}

/// Append-only CSV file whose header is pinned by the first row it ever held.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    header: Option<Vec<String>>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, row: &OutputRow) -> Result<(), SinkError> {
        self.append_batch(std::slice::from_ref(row))
    }

    /// Writes, flushes and syncs `rows` before returning.
    pub fn append_batch(&mut self, rows: &[OutputRow]) -> Result<(), SinkError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        ensure_parent_dir(&self.path)?;

        let write_header = self.is_empty_or_missing();
        if !write_header && self.header.is_none() {
            self.header = self.read_existing_header()?;
        }
        let header = self
            .header
            .get_or_insert_with(|| first.columns().map(str::to_string).collect())
            .clone();

        let records = rows
            .iter()
            .map(|row| self.align(row, &header))
            .collect::<Result<Vec<_>, _>>()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            writer
                .write_record(&header)
                .map_err(|source| self.csv_error(source))?;
        }
        for record in &records {
            writer
                .write_record(record)
                .map_err(|source| self.csv_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))?;
        writer
            .get_ref()
            .sync_data()
            .map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn is_empty_or_missing(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true)
    }

    fn read_existing_header(&self) -> Result<Option<Vec<String>>, SinkError> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let header: Vec<String> = reader
            .headers()
            .map_err(|source| self.csv_error(source))?
            .iter()
            .map(str::to_string)
            .collect();
        Ok(if header.is_empty() { None } else { Some(header) })
    }

    /// Orders a row's values by the pinned header. The column sets must match.
    fn align(&self, row: &OutputRow, header: &[String]) -> Result<Vec<String>, SinkError> {
        let same_set = row.fields().len() == header.len()
            && header.iter().all(|name| row.get(name).is_some());
        if !same_set {
            return Err(SinkError::ColumnMismatch {
                path: self.path.clone(),
                expected: header.to_vec(),
                found: row.columns().map(str::to_string).collect(),
            });
        }
        Ok(header
            .iter()
            .map(|name| row.get(name).unwrap_or_default().to_string())
            .collect())
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> SinkError {
        SinkError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkPaths {
    pub found: PathBuf,
    pub failed: PathBuf,
    pub redirected: PathBuf,
    /// Skip log; `None` means skips are only logged, not written.
    pub skipped: Option<PathBuf>,
}

/// The run's output files, one per routing category.
#[derive(Debug)]
pub struct SinkSet {
    found: CsvSink,
    failed: CsvSink,
    redirected: CsvSink,
    skipped: Option<CsvSink>,
}

impl SinkSet {
    pub fn new(paths: &SinkPaths) -> Self {
        Self {
            found: CsvSink::new(paths.found.clone()),
            failed: CsvSink::new(paths.failed.clone()),
            redirected: CsvSink::new(paths.redirected.clone()),
            skipped: paths.skipped.clone().map(CsvSink::new),
        }
    }

    pub fn record(&mut self, decision: &RouteDecision) -> Result<SinkKind, SinkError> {
        let kind = decision.sink();
        let sink = match kind {
            SinkKind::Found => &mut self.found,
            SinkKind::Failed => &mut self.failed,
            SinkKind::Redirected => &mut self.redirected,
            SinkKind::Skipped => match self.skipped.as_mut() {
                Some(sink) => sink,
                None => return Ok(kind),
            },
        };
        sink.append(decision.row())?;
        Ok(kind)
    }

    /// Returns whether a skip record was written.
    pub fn log_skip(&mut self, unit: &WorkUnit) -> Result<bool, SinkError> {
        let Some(sink) = self.skipped.as_mut() else {
            return Ok(false);
        };
        let row = OutputRow::from_unit(unit).with(REASON_FIELD, REASON_ALREADY_PROCESSED);
        sink.append(&row)?;
        Ok(true)
    }
}
