use std::fs;

use space_shooter::error::StorageError;
use space_shooter::storage::*;

// ── ScoreStore ────────────────────────────────────────────────────────────────

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScoreStore::new(dir.path().join("scores.json"));
    store.save(42).unwrap();
    assert_eq!(store.load(), 42);
}

#[test]
fn saved_file_is_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    ScoreStore::new(&path).save(17).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["best_score"], 17);
}

#[test]
fn missing_file_loads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScoreStore::new(dir.path().join("nope.json"));
    assert_eq!(store.load(), 0);
    assert!(store.try_load().unwrap_err().is_not_found());
}

#[test]
fn corrupt_file_loads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(&path, "{ not json").unwrap();
    let store = ScoreStore::new(&path);

    assert_eq!(store.load(), 0);
    assert!(matches!(store.try_load(), Err(StorageError::Json { .. })));
}

#[test]
fn missing_field_defaults_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(&path, "{}").unwrap();
    assert_eq!(ScoreStore::new(&path).try_load().unwrap(), 0);
}

#[test]
fn save_overwrites_previous_best() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScoreStore::new(dir.path().join("scores.json"));
    store.save(50).unwrap();
    store.save(0).unwrap();
    assert_eq!(store.load(), 0);
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScoreStore::new(dir.path().join("no/such/dir/scores.json"));
    let err = store.save(1).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
    assert!(err.to_string().contains("scores.json"));
}

// ── Description ───────────────────────────────────────────────────────────────

#[test]
fn description_lines_are_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("info.txt");
    fs::write(&path, "SPACE SHOOTER\n\n  Shoot things.\n").unwrap();
    assert_eq!(
        load_description(&path),
        vec!["SPACE SHOOTER", "", "  Shoot things."]
    );
}

#[test]
fn missing_description_uses_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let lines = load_description(&dir.path().join("info.txt"));
    assert_eq!(lines, MISSING_DESCRIPTION.to_vec());
}

#[test]
fn unreadable_description_reports_error_line() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists but cannot be read as text.
    let lines = load_description(dir.path());
    assert_eq!(lines, vec![UNREADABLE_DESCRIPTION.to_string()]);
}
