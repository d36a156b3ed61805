use std::fs;

use lyrics_core::{OutputRow, WorkUnit};
use lyrics_engine::{CsvSink, SinkError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn row(track: &str, artist: &str, lyrics: &str) -> OutputRow {
    let unit = WorkUnit::from_pairs([("track", track), ("artist", artist)]);
    OutputRow::from_unit(&unit).with("lyrics", lyrics)
}

#[test]
fn header_is_written_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out").join("found.csv");
    let mut sink = CsvSink::new(&path);

    sink.append(&row("The Chain", "Fleetwood Mac", "Listen")).unwrap();
    sink.append(&row("Dreams", "Fleetwood Mac", "Now here")).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "track,artist,lyrics\nThe Chain,Fleetwood Mac,Listen\nDreams,Fleetwood Mac,Now here\n"
    );
}

#[test]
fn existing_file_keeps_its_header() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("found.csv");
    fs::write(&path, "track,artist,lyrics\nOld,Band,words\n").unwrap();

    let mut sink = CsvSink::new(&path);
    sink.append(&row("New", "Band", "more words")).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "track,artist,lyrics\nOld,Band,words\nNew,Band,more words\n"
    );
}

#[test]
fn reordered_columns_follow_the_header() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("found.csv");
    fs::write(&path, "lyrics,artist,track\n").unwrap();

    let mut sink = CsvSink::new(&path);
    sink.append(&row("The Chain", "Fleetwood Mac", "Listen")).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "lyrics,artist,track\nListen,Fleetwood Mac,The Chain\n"
    );
}

#[test]
fn different_column_set_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("found.csv");
    let mut sink = CsvSink::new(&path);
    sink.append(&row("The Chain", "Fleetwood Mac", "Listen")).unwrap();

    let odd = OutputRow::from_unit(&WorkUnit::from_pairs([("track", "X"), ("artist", "Y")]));
    let err = sink.append(&odd).unwrap_err();

    assert!(matches!(err, SinkError::ColumnMismatch { .. }), "got {err:?}");
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn multiline_and_comma_values_are_quoted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("found.csv");
    let mut sink = CsvSink::new(&path);

    sink.append(&row("Hello, Goodbye", "The Beatles", "You say yes\nI say no"))
        .unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "Hello, Goodbye");
    assert_eq!(&record[2], "You say yes\nI say no");
}
