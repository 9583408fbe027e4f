//! Tests for ProgressStore

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use tapmath::application::services::ProgressStore;
use tapmath::domain::Progress;
use tapmath::infrastructure::traits::{Clock, RealFileSystem};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn t(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn store(temp: &TempDir, now: DateTime<Utc>) -> ProgressStore {
    ProgressStore::new(
        Arc::new(RealFileSystem),
        Arc::new(FixedClock(now)),
        temp.path().join("state").join("tapmath-progress.json"),
    )
}

#[test]
fn given_no_saved_record_when_loading_then_starts_empty() {
    let temp = TempDir::new().unwrap();

    let progress = store(&temp, t(1)).load();

    assert_eq!(progress, Progress::new(t(1)));
}

#[test]
fn given_corrupt_record_when_loading_then_falls_back_to_empty() {
    tapmath::util::testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let store = store(&temp, t(1));
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "{ not json").unwrap();

    let progress = store.load();

    assert!(progress.completed.is_empty());
    assert_eq!(progress.last_accessed, t(1));
}

#[test]
fn given_completed_concepts_when_persisting_then_reload_returns_same_record() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, t(2));
    let progress = store.mark_complete(&store.load(), "counting");
    let progress = store.mark_complete(&progress, "shapes");

    store.persist(&progress).expect("persist progress");
    let reloaded = store.load();

    assert_eq!(reloaded, progress);
    assert!(reloaded.is_completed("counting"));
    assert!(reloaded.is_completed("shapes"));
    assert_eq!(reloaded.last_accessed, t(2));
}

#[test]
fn given_persisted_record_when_reading_file_then_uses_camel_case_keys() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, t(3));
    let progress = store.mark_complete(&Progress::new(t(1)), "patterns");

    store.persist(&progress).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["completed"], serde_json::json!(["patterns"]));
    assert_eq!(raw["favorites"], serde_json::json!([]));
    assert!(raw["lastAccessed"].is_string());
}

#[test]
fn given_already_completed_concept_when_marking_again_then_record_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let first = store(&temp, t(4)).mark_complete(&Progress::new(t(1)), "counting");

    let again = store(&temp, t(9)).mark_complete(&first, "counting");

    assert_eq!(again, first);
    assert_eq!(again.last_accessed, t(4));
}
