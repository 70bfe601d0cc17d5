//! End-to-end tests for the document form.
//!
//! These drive [`FormController`] through the public API exactly as a front
//! end would: select, type, submit, read the rendered [`FormView`]. The
//! simulated processor runs with a short delay so the suite stays fast.
//!
//! Run with:
//!   cargo test --test form_flow -- --nocapture

use docproc::{
    ApiKey, Banner, FormConfig, FormController, FormEvent, FormObserver, Phase, ProcessingError,
    ProcessingReceipt, SelectedFile, SimulatedProcessor, Ticket, ViewCommand,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ── Test helpers ─────────────────────────────────────────────────────────────

const FAST_DELAY_MS: u64 = 20;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("docproc=debug"))
        .with_test_writer()
        .try_init();
}

fn fast_form() -> FormController {
    init_tracing();
    let config = FormConfig::builder()
        .processing_delay_ms(FAST_DELAY_MS)
        .build()
        .expect("valid config");
    FormController::simulated(config)
}

fn report_pdf() -> SelectedFile {
    SelectedFile::new("report.pdf", 2 * 1024 * 1024)
}

/// Records every observer callback in order.
#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    fn snapshot(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl FormObserver for EventLog {
    fn on_transition(&self, from: &Phase, to: &Phase) {
        let name = |p: &Phase| match p {
            Phase::Idle => "idle",
            Phase::Errored(_) => "errored",
            Phase::Processing(_) => "processing",
            Phase::Processed(_) => "processed",
        };
        self.events
            .lock()
            .unwrap()
            .push(format!("{}->{}", name(from), name(to)));
    }

    fn on_submission_start(&self, _ticket: Ticket, file_name: &str) {
        self.events.lock().unwrap().push(format!("start:{file_name}"));
    }

    fn on_view_command(&self, command: &ViewCommand) {
        self.events.lock().unwrap().push(format!("view:{command:?}"));
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_report_pdf_success() {
    let mut form = fast_form();
    form.select_file(report_pdf());
    form.edit_api_key("sk-test");

    let before = form.view();
    assert_eq!(before.selected_file.as_deref(), Some("Selected: report.pdf (2.00 MB)"));
    assert!(before.submit_enabled);

    let ticket = form.begin_submit().expect("valid submit starts processing");
    let busy = form.view();
    assert_eq!(busy.submit_label, "Processing...");
    assert!(!busy.submit_enabled);
    assert!(busy.banner.is_none(), "no error on the success path");

    let phase = form.next_completion().await;
    assert!(matches!(phase, Some(Phase::Processed(_))), "got {phase:?} for ticket {ticket}");

    let done = form.view();
    match done.banner {
        Some(Banner::Success(ref msg)) => {
            assert!(msg.contains("\"report.pdf\""), "got: {msg}");
            assert!(msg.starts_with("Document processed successfully!"));
        }
        ref other => panic!("expected success banner, got {other:?}"),
    }
    assert!(!done.submit_enabled);
    assert_eq!(done.reset_label, Some("Process Another"));
    assert_eq!(done.submit_label, "Process Document");
}

#[tokio::test]
async fn scenario_submit_without_file() {
    let mut form = fast_form();
    form.edit_api_key("sk-test");

    assert!(form.begin_submit().is_none());
    assert_eq!(
        form.view().banner,
        Some(Banner::Error("Please select a file to process".into()))
    );
    assert!(!form.state().is_processing());
    assert_eq!(form.state().api_key.expose(), "sk-test");
}

#[tokio::test]
async fn scenario_blank_key() {
    let mut form = fast_form();
    form.select_file(report_pdf());

    for blank in ["", "   ", "\t\n"] {
        form.edit_api_key(blank);
        let state = form.submit().await;
        assert_eq!(state.error_message(), "Please enter your API key");
        assert!(!state.is_processing());
    }
}

#[tokio::test]
async fn submission_waits_for_the_simulated_delay() {
    let mut form = fast_form();
    form.select_file(report_pdf());
    form.edit_api_key("sk-test");

    let start = Instant::now();
    let state = form.submit().await;
    assert!(state.is_processed());
    assert!(start.elapsed() >= Duration::from_millis(FAST_DELAY_MS));
}

#[tokio::test]
async fn reset_after_success_restores_initial_form() {
    let log = Arc::new(EventLog::default());
    let config = FormConfig::builder()
        .processing_delay_ms(FAST_DELAY_MS)
        .observer(log.clone())
        .build()
        .unwrap();
    let mut form = FormController::simulated(config);

    form.select_file(report_pdf());
    form.edit_api_key("sk-test");
    form.submit().await;
    form.reset();

    let state = form.state();
    assert!(state.file.is_none());
    assert_eq!(state.api_key, ApiKey::default());
    assert!(!state.is_processed());
    assert_eq!(state.error_message(), "");

    let view = form.view();
    assert!(view.submit_enabled);
    assert!(view.reset_label.is_none());
    assert!(view.selected_file.is_none());

    assert_eq!(
        log.snapshot(),
        vec![
            "idle->processing",
            "start:report.pdf",
            "processing->processed",
            "processed->idle",
            "view:ClearFileInput",
        ]
    );
}

#[tokio::test]
async fn toggling_visibility_changes_only_display() {
    let mut form = fast_form();
    form.edit_api_key("sk-test");
    form.begin_submit(); // file missing: errored

    let error_before = form.state().error_message().to_string();
    form.toggle_key_visibility();

    assert_eq!(form.state().api_key.expose(), "sk-test");
    assert_eq!(form.state().error_message(), error_before);
    assert_eq!(form.view().api_key_display, "sk-test");

    form.toggle_key_visibility();
    assert_eq!(form.view().api_key_display, "•••••••");
}

#[tokio::test]
async fn editing_key_clears_error_immediately() {
    let mut form = fast_form();
    form.select_file(report_pdf());
    form.submit().await;
    assert!(!form.state().error_message().is_empty());

    form.edit_api_key("s");
    assert_eq!(form.state().error_message(), "");
    assert!(!form.state().is_processing());
    assert!(!form.state().is_processed());
}

#[tokio::test]
async fn failure_shows_retry_message_and_reenables_submit() {
    init_tracing();
    let processor = Arc::new(SimulatedProcessor::failing(
        Duration::from_millis(FAST_DELAY_MS),
        "simulated outage",
    ));
    let mut form = FormController::new(processor, FormConfig::default());
    form.select_file(report_pdf());
    form.edit_api_key("sk-test");

    let state = form.submit().await;
    assert_eq!(
        state.error_message(),
        "Failed to process document. Please try again."
    );
    let view = form.view();
    assert!(view.submit_enabled);
    assert_eq!(view.submit_label, "Process Document");
    assert!(view.reset_label.is_none());
}

#[tokio::test]
async fn reset_while_processing_ignores_the_late_completion() {
    let mut form = fast_form();
    form.select_file(report_pdf());
    form.edit_api_key("sk-test");

    let cancelled = form.begin_submit().unwrap();
    form.reset();
    assert_eq!(form.state().phase, Phase::Idle);

    // A success for the cancelled ticket arriving now changes nothing.
    form.dispatch(FormEvent::Completed {
        ticket: cancelled,
        result: Ok(ProcessingReceipt {
            file_name: "report.pdf".into(),
            size_bytes: 2 * 1024 * 1024,
            processor: "simulated".into(),
            elapsed_ms: FAST_DELAY_MS,
        }),
    });
    assert_eq!(form.state().phase, Phase::Idle);
    assert!(form.view().banner.is_none());

    // Give the cancelled task well past its delay, then submit another
    // document: its outcome, not the old one, must land on the form.
    tokio::time::sleep(Duration::from_millis(FAST_DELAY_MS * 3)).await;
    form.select_file(SelectedFile::new("notes.md", 4 * 1024));
    form.edit_api_key("sk-test");
    let current = form.begin_submit().unwrap();
    assert_ne!(current, cancelled);

    match form.next_completion().await {
        Some(Phase::Processed(receipt)) => assert_eq!(receipt.file_name, "notes.md"),
        other => panic!("expected notes.md to be processed, got {other:?}"),
    }
    match form.view().banner {
        Some(Banner::Success(ref m)) => assert!(m.contains("\"notes.md\""), "got: {m}"),
        ref other => panic!("expected success banner, got {other:?}"),
    }
}

#[tokio::test]
async fn new_file_during_processing_supersedes_submission() {
    let mut form = fast_form();
    form.select_file(report_pdf());
    form.edit_api_key("sk-test");
    form.begin_submit().unwrap();

    form.select_file(SelectedFile::new("notes.md", 512));
    assert_eq!(form.state().phase, Phase::Idle);
    assert_eq!(form.state().api_key.expose(), "sk-test");

    let state = form.submit().await;
    match state.phase {
        Phase::Processed(ref receipt) => assert_eq!(receipt.file_name, "notes.md"),
        ref other => panic!("expected processed, got {other:?}"),
    }
}

#[tokio::test]
async fn enforced_limits_reject_before_processing() {
    init_tracing();
    let config = FormConfig::builder()
        .processing_delay_ms(FAST_DELAY_MS)
        .enforce_file_limits(true)
        .build()
        .unwrap();
    let mut form = FormController::simulated(config);
    form.edit_api_key("sk-test");

    form.select_file(SelectedFile::new("scan.tiff", 1024));
    assert!(form.begin_submit().is_none());
    assert!(form.state().error_message().contains("scan.tiff"));

    form.select_file(SelectedFile::new("huge.pdf", 11 * 1024 * 1024));
    assert!(form.begin_submit().is_none());
    assert!(form.state().error_message().contains("too large"));
}

#[tokio::test]
async fn file_selected_from_disk() {
    let mut form = fast_form();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minutes.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(&vec![b'x'; 1024 * 1024]).unwrap();
    drop(f);

    let file = tokio_test::assert_ok!(SelectedFile::from_path(&path).await);
    form.select_file(file);
    form.edit_api_key("sk-test");

    assert_eq!(
        form.view().selected_file.as_deref(),
        Some("Selected: minutes.txt (1.00 MB)")
    );
    assert!(form.submit().await.is_processed());
}

#[tokio::test]
async fn cancelled_result_from_processor_returns_to_idle() {
    use async_trait::async_trait;
    use docproc::{DocumentProcessor, ProcessingReceipt};

    struct GivesUp;

    #[async_trait]
    impl DocumentProcessor for GivesUp {
        fn name(&self) -> &str {
            "gives-up"
        }

        async fn process(
            &self,
            _file: &SelectedFile,
            _api_key: &ApiKey,
        ) -> Result<ProcessingReceipt, ProcessingError> {
            Err(ProcessingError::Cancelled)
        }
    }

    let mut form = FormController::new(Arc::new(GivesUp), FormConfig::default());
    form.select_file(report_pdf());
    form.edit_api_key("k");
    let state = form.submit().await;
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.submit_enabled());
}
