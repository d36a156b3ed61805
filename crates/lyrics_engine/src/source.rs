use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use lyrics_core::{WorkUnit, ARTIST_FIELD, TRACK_FIELD};
use lyrics_logging::lyrics_info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read input {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed input {path:?}: {message}")]
    Format { path: PathBuf, message: String },
}

/// Reads the whole input table into memory, preserving row and column order.
pub fn load_work_units(path: &Path) -> Result<Vec<WorkUnit>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let units = read_work_units(file, path)?;
    lyrics_info!("Loaded {} work units from {:?}", units.len(), path);
    Ok(units)
}

fn read_work_units<R: Read>(reader: R, path: &Path) -> Result<Vec<WorkUnit>, SourceError> {
    let format_error = |message: String| SourceError::Format {
        path: path.to_path_buf(),
        message,
    };
    let csv_error = |err: csv::Error| map_csv_error(err, path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(|name| name.is_empty()) {
        return Err(format_error("missing header row".to_string()));
    }
    for (index, name) in headers.iter().enumerate() {
        if headers[..index].contains(name) {
            return Err(format_error(format!("duplicate column `{name}`")));
        }
    }
    for required in [TRACK_FIELD, ARTIST_FIELD] {
        if !headers.iter().any(|name| name == required) {
            return Err(format_error(format!("missing required column `{required}`")));
        }
    }

    let mut units = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        units.push(WorkUnit::new(fields));
    }
    Ok(units)
}

fn map_csv_error(err: csv::Error, path: &Path) -> SourceError {
    if !err.is_io_error() {
        return SourceError::Format {
            path: path.to_path_buf(),
            message: err.to_string(),
        };
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => SourceError::Format {
            path: path.to_path_buf(),
            message: format!("{other:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> Result<Vec<WorkUnit>, SourceError> {
        read_work_units(input.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn byte_order_mark_is_ignored_in_header() {
        let units = read("\u{feff}track,artist\nA,B\n").unwrap();
        assert_eq!(units[0].track(), "A");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let units = read("track,artist,seeds\n\"Hello, Goodbye\",The Beatles,\"['pop', 'rock']\"\n")
            .unwrap();
        assert_eq!(units[0].track(), "Hello, Goodbye");
        assert_eq!(units[0].get("seeds"), Some("['pop', 'rock']"));
    }
}
