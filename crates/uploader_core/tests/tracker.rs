use std::sync::{Arc, Once};

use uploader_core::{FileRef, FileSource, UploadRecord, UploadStatus, UploadTracker};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn file_ref(name: &str, size: u64) -> FileRef {
    FileRef {
        name: name.to_string(),
        size,
        media_type: None,
        source: FileSource::Memory(Arc::new(Vec::new())),
    }
}

#[test]
fn records_keep_insertion_order() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("a", file_ref("a.jpg", 10)));
    tracker.add(UploadRecord::uploading("b", file_ref("b.jpg", 20)));
    tracker.add(UploadRecord::uploading("c", file_ref("c.jpg", 30)));

    let ids: Vec<_> = tracker.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    tracker.remove("b");
    let ids: Vec<_> = tracker.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn duplicate_add_is_rejected() {
    init_logging();
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("a", file_ref("first.jpg", 10)));
    tracker.add(UploadRecord::uploading("a", file_ref("second.jpg", 20)));

    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.get("a").unwrap().file.name, "first.jpg");
}

#[test]
fn operations_on_absent_ids_are_noops() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("a", file_ref("a.jpg", 10)));
    let before = tracker.clone();

    tracker.remove("ghost");
    tracker.update_progress("ghost", 50);
    tracker.update_status("ghost", UploadStatus::Failed, Some("boom".to_string()));

    assert_eq!(tracker, before);
}

#[test]
fn progress_is_stored_without_clamping() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("a", file_ref("a.jpg", 10)));

    tracker.update_progress("a", 150);
    assert_eq!(tracker.get("a").unwrap().progress, 150);
}

#[test]
fn non_failed_status_clears_stale_error() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::failed("a", file_ref("a.jpg", 10), "Too Large"));
    assert_eq!(tracker.get("a").unwrap().error.as_deref(), Some("Too Large"));

    // Passing an error alongside a non-failed status is inconsistent input;
    // the tracker keeps the invariant by dropping it.
    tracker.update_status("a", UploadStatus::Completed, Some("leftover".to_string()));
    let record = tracker.get("a").unwrap();
    assert_eq!(record.status, UploadStatus::Completed);
    assert_eq!(record.error, None);

    tracker.update_status("a", UploadStatus::Failed, Some("late failure".to_string()));
    assert_eq!(tracker.get("a").unwrap().error.as_deref(), Some("late failure"));
}

#[test]
fn lifecycle_progress_then_completion() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("f1", file_ref("f1.png", 2048)));

    tracker.update_progress("f1", 55);
    tracker.update_status("f1", UploadStatus::Completed, None);

    let record = tracker.get("f1").unwrap();
    assert_eq!(record.progress, 55);
    assert_eq!(record.status, UploadStatus::Completed);
    assert_eq!(record.error, None);
}

#[test]
fn clear_empties_the_list() {
    let mut tracker = UploadTracker::new();
    tracker.add(UploadRecord::uploading("a", file_ref("a.jpg", 10)));
    tracker.add(UploadRecord::uploading("b", file_ref("b.jpg", 20)));

    tracker.clear();
    assert!(tracker.is_empty());
    assert!(!tracker.any_uploading());
}

#[test]
fn any_uploading_tracks_inflight_records() {
    let mut tracker = UploadTracker::new();
    assert!(!tracker.any_uploading());

    tracker.add(UploadRecord::uploading("a", file_ref("a.jpg", 10)));
    assert!(tracker.any_uploading());

    tracker.update_status("a", UploadStatus::Completed, None);
    assert!(!tracker.any_uploading());
}
