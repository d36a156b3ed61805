use std::fs;

use lyrics_core::{ProgressStore, UnitKey};
use lyrics_engine::{load_progress, persist_progress, ProgressError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn absent_file_starts_empty() {
    let temp = TempDir::new().unwrap();
    let store = load_progress(&temp.path().join("progress.json")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn persisted_ledger_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state").join("progress.json");

    let mut store = ProgressStore::new();
    store.mark_done(UnitKey::new("The Chain", "Fleetwood Mac"));
    store.mark_done(UnitKey::new("Dreams", "Fleetwood Mac"));
    persist_progress(&store, &path).unwrap();

    let loaded = load_progress(&path).unwrap();
    assert_eq!(loaded, store);
    assert!(loaded.is_done(&UnitKey::new("the chain ", "FLEETWOOD MAC")));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["the chain|fleetwood mac"], serde_json::json!(true));
}

#[test]
fn rewrite_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("progress.json");

    let mut store = ProgressStore::new();
    store.mark_done(UnitKey::new("A", "B"));
    persist_progress(&store, &path).unwrap();
    store.mark_done(UnitKey::new("C", "D"));
    persist_progress(&store, &path).unwrap();

    assert_eq!(load_progress(&path).unwrap().done_count(), 2);
    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1, "no temp files may remain next to the ledger");
}

#[test]
fn unparsable_file_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("progress.json");
    fs::write(&path, "{\"the chain|fleetwood mac\": tru").unwrap();

    let err = load_progress(&path).unwrap_err();
    assert!(matches!(err, ProgressError::Corrupt { .. }), "got {err:?}");
}

#[test]
fn wrong_shape_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("progress.json");
    fs::write(&path, "[\"the chain|fleetwood mac\"]").unwrap();

    let err = load_progress(&path).unwrap_err();
    assert!(matches!(err, ProgressError::Corrupt { .. }), "got {err:?}");
}
