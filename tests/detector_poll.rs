use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use tempfile::TempDir;

use hotreload::config::WatchConfig;
use hotreload::errors::WatchError;
use hotreload::watch::{ChangeKind, PollingDetector};

type TestResult = Result<(), Box<dyn Error>>;

fn detector(dir: &TempDir, patterns: &[&str]) -> Result<PollingDetector, WatchError> {
    let mut config = WatchConfig::new(dir.path(), vec!["true".to_string()]);
    config.patterns = patterns.iter().map(|p| p.to_string()).collect();
    PollingDetector::new(Arc::new(config))
}

#[test]
fn baseline_files_are_not_reported_as_created() -> TestResult {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.rs"), "fn main() {}")?;
    fs::write(dir.path().join("b.rs"), "")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    assert_eq!(det.poll_once()?, vec![]);
    assert_eq!(det.tracked_paths().len(), 2);
    Ok(())
}

#[test]
fn file_added_between_scans_is_reported_exactly_once_as_created() -> TestResult {
    let dir = TempDir::new()?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    fs::write(dir.path().join("new.rs"), "")?;

    let changes = det.poll_once()?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Created);
    assert!(changes[0].path.ends_with("new.rs"));

    // Idempotence: a no-op cycle produces no events.
    assert_eq!(det.poll_once()?, vec![]);
    Ok(())
}

#[test]
fn rewriting_a_file_is_reported_as_modified() -> TestResult {
    let dir = TempDir::new()?;
    let file = dir.path().join("a.rs");
    fs::write(&file, "v1")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    // Coarse mtime clocks need a little room to observe a strictly later time.
    sleep(Duration::from_millis(100));
    fs::write(&file, "v2")?;

    let changes = det.poll_once()?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Modified);
    Ok(())
}

#[test]
fn deleted_file_is_reported_and_dropped_from_tracking() -> TestResult {
    let dir = TempDir::new()?;
    let file = dir.path().join("gone.rs");
    fs::write(&file, "")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    fs::remove_file(&file)?;

    let changes = det.poll_once()?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Deleted);
    assert!(changes[0].path.ends_with("gone.rs"));

    // No stale entry survives into the next cycle.
    assert!(det.tracked_paths().is_empty());
    assert_eq!(det.poll_once()?, vec![]);
    Ok(())
}

#[test]
fn created_and_modified_are_emitted_before_deleted_within_a_cycle() -> TestResult {
    let dir = TempDir::new()?;
    let old = dir.path().join("old.rs");
    fs::write(&old, "")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    fs::remove_file(&old)?;
    fs::write(dir.path().join("fresh.rs"), "")?;

    let changes = det.poll_once()?;
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind, ChangeKind::Created);
    assert_eq!(changes[1].kind, ChangeKind::Deleted);
    Ok(())
}

#[test]
fn hidden_segments_are_skipped() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join(".git"))?;
    fs::write(dir.path().join(".git").join("inner.rs"), "")?;
    fs::write(dir.path().join(".secret.rs"), "")?;
    fs::write(dir.path().join("visible.rs"), "")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;

    let tracked = det.tracked_paths();
    assert_eq!(tracked.len(), 1);
    assert!(tracked[0].ends_with("visible.rs"));
    Ok(())
}

#[test]
fn patterns_match_against_the_full_path() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(dir.path().join("src").join("main.rs"), "")?;
    fs::write(dir.path().join("other.rs"), "")?;
    fs::write(dir.path().join("notes.txt"), "")?;

    // Anchor on a directory segment, which only works with full-path
    // matching.
    let mut det = detector(&dir, &[r"src/.*\.rs$"])?;
    det.initial_scan()?;

    let tracked = det.tracked_paths();
    assert_eq!(tracked.len(), 1);
    assert!(tracked[0].ends_with("src/main.rs"));
    Ok(())
}

#[test]
fn tracked_set_mirrors_disk_across_cycles() -> TestResult {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.rs"), "")?;

    let mut det = detector(&dir, &[r"\.rs$"])?;
    det.initial_scan()?;
    assert_eq!(det.tracked_paths().len(), 1);

    fs::write(dir.path().join("b.rs"), "")?;
    det.poll_once()?;
    assert_eq!(det.tracked_paths().len(), 2);

    fs::remove_file(dir.path().join("a.rs"))?;
    fs::remove_file(dir.path().join("b.rs"))?;
    det.poll_once()?;
    assert!(det.tracked_paths().is_empty());
    Ok(())
}

#[test]
fn invalid_pattern_fails_at_construction() {
    let dir = TempDir::new().expect("tempdir");
    let err = detector(&dir, &["["]).err().expect("expected pattern error");
    assert!(matches!(err, WatchError::Pattern { .. }));
}

#[test]
fn stop_is_a_harmless_noop() -> TestResult {
    let dir = TempDir::new()?;
    let det = detector(&dir, &[r"\.rs$"])?;
    det.stop();
    Ok(())
}
