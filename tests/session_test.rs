//! Tests for ExplorerSession: refresh, selection and filter handling

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use captree::application::services::ExplorerService;
use captree::application::{ExplorerSession, FetchStatus, RefreshOutcome};
use captree::domain::{SpendRow, ValueFilter};
use captree::infrastructure::traits::{StaticSource, TableSource};
use captree::util::testing;

fn rows() -> Vec<SpendRow> {
    vec![
        SpendRow::new("A", "B", "C", "x1", 100.0).with_name("One"),
        SpendRow::new("A", "B", "C", "x2", 5000.0).with_name("Two"),
        SpendRow::new("A", "B", "D", "x3", 250.0),
    ]
}

fn session_with(source: Arc<dyn TableSource>) -> ExplorerSession {
    testing::init_test_setup();
    ExplorerSession::new(ExplorerService::new(source))
}

fn loaded_session() -> ExplorerSession {
    let session = session_with(Arc::new(StaticSource::new(rows())));
    assert!(matches!(session.refresh(), RefreshOutcome::Loaded { .. }));
    session
}

/// Fails after the first successful fetch once `fail` is set.
struct FlakySource {
    fail: AtomicBool,
}

impl TableSource for FlakySource {
    fn fetch_rows(&self) -> io::Result<Vec<SpendRow>> {
        if self.fail.load(Ordering::SeqCst) {
            Err(io::Error::new(io::ErrorKind::NotFound, "table gone"))
        } else {
            Ok(rows())
        }
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

/// Blocks inside `fetch_rows` until released.
struct GatedSource {
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl TableSource for GatedSource {
    fn fetch_rows(&self) -> io::Result<Vec<SpendRow>> {
        self.entered
            .lock()
            .unwrap()
            .send(())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.release
            .lock()
            .unwrap()
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(rows())
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

// ============================================================
// Refresh
// ============================================================

#[test]
fn given_new_session_when_reading_then_empty_root_and_no_status() {
    let session = session_with(Arc::new(StaticSource::default()));

    let state = session.snapshot();

    assert!(state.data.children().is_empty());
    assert!(state.fetch_status.is_none());
    assert!(state.selection.is_none());
    assert!(state.value_filter.is_none());
}

#[test]
fn given_table_when_refreshing_then_tree_loaded_and_done() {
    let session = session_with(Arc::new(StaticSource::new(rows())));

    let outcome = session.refresh();

    assert_eq!(
        outcome,
        RefreshOutcome::Loaded {
            rows: 3,
            duplicates: 0
        }
    );
    let state = session.snapshot();
    assert_eq!(state.fetch_status, Some(FetchStatus::Done));
    assert!(state.error.is_none());
    assert_eq!(state.data.children().len(), 1);
}

#[test]
fn given_failing_source_when_refreshing_then_error_stored_and_tree_reset() {
    // Arrange: first load succeeds
    let source = Arc::new(FlakySource {
        fail: AtomicBool::new(false),
    });
    let session = session_with(source.clone());
    session.refresh();
    let old_tree = session.tree();
    assert!(!old_tree.children().is_empty());

    // Act
    source.fail.store(true, Ordering::SeqCst);
    let outcome = session.refresh();

    // Assert
    let RefreshOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {:?}", outcome);
    };
    assert!(message.contains("load table: flaky"), "message: {}", message);

    let state = session.snapshot();
    assert_eq!(state.error.as_deref(), Some(message.as_str()));
    assert_eq!(state.fetch_status, Some(FetchStatus::Done));
    assert!(state.data.children().is_empty());
    // Readers holding the previous tree keep it intact
    assert_eq!(old_tree.children().len(), 1);
}

#[test]
fn given_refresh_in_flight_when_refreshing_again_then_skipped() {
    // Arrange
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let source = Arc::new(GatedSource {
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });
    let session = Arc::new(session_with(source));

    let worker = {
        let session = Arc::clone(&session);
        thread::spawn(move || session.refresh())
    };
    entered_rx.recv().expect("worker entered fetch");

    // Act
    let second = session.refresh();

    // Assert
    assert_eq!(second, RefreshOutcome::AlreadyInProgress);
    assert_eq!(session.snapshot().fetch_status, Some(FetchStatus::InProgress));

    release_tx.send(()).unwrap();
    let first = worker.join().unwrap();
    assert_eq!(
        first,
        RefreshOutcome::Loaded {
            rows: 3,
            duplicates: 0
        }
    );
    assert_eq!(session.snapshot().fetch_status, Some(FetchStatus::Done));
}

// ============================================================
// Selection and filter
// ============================================================

#[test]
fn given_no_selection_when_listing_leaves_then_none() {
    let session = loaded_session();

    assert!(session.visible_leaves().is_none());
}

#[test]
fn given_level3_selection_when_listing_leaves_then_direct_leaves() {
    let session = loaded_session();

    session.select(Some("3"));
    let leaves = session.visible_leaves().unwrap();

    let names: Vec<&str> = leaves.iter().map(|leaf| leaf.name()).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn given_valid_filter_input_when_applying_then_filter_set_and_leaves_narrowed() {
    let session = loaded_session();
    session.select(Some("3"));
    assert_eq!(session.domain(), ValueFilter::new(100.0, 5000.0).unwrap());

    let applied = session.apply_filter_input(&[1000.0, 100.0]);

    assert_eq!(applied, ValueFilter::new(100.0, 1000.0));
    assert_eq!(session.snapshot().value_filter, applied);
    let leaves = session.visible_leaves().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].id(), "x1");
}

#[test]
fn given_invalid_filter_input_when_applying_then_prior_filter_kept() {
    let session = loaded_session();
    let prior = session.apply_filter_input(&[200.0, 300.0]);
    assert!(prior.is_some());

    let rejected = session.apply_filter_input(&[9000.0]);

    assert!(rejected.is_none());
    assert_eq!(session.snapshot().value_filter, prior);
}

#[test]
fn given_filter_when_clearing_then_all_leaves_visible() {
    let session = loaded_session();
    session.select(Some("3"));
    session.apply_filter_input(&[150.0, 4000.0]);
    assert!(session.visible_leaves().unwrap().is_empty());

    session.clear_filter();

    assert!(session.snapshot().value_filter.is_none());
    assert_eq!(session.visible_leaves().unwrap().len(), 2);
}

#[test]
fn given_selection_cleared_when_listing_leaves_then_none() {
    let session = loaded_session();
    session.select(Some("3"));

    session.select(None);

    assert!(session.visible_leaves().is_none());
}
