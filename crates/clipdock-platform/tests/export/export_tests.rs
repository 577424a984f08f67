use super::*;
use clipdock_contracts::codes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

enum Scripted {
    Park,
    Cancel,
    Choose(PathBuf),
    Fail,
}

#[derive(Default)]
struct ScriptedSurface {
    script: Mutex<VecDeque<Scripted>>,
    parked: Mutex<Vec<ExportChoiceSender>>,
    calls: AtomicUsize,
}

impl ScriptedSurface {
    fn with_script(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            parked: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn parked_count(&self) -> usize {
        self.parked.lock().expect("parked lock").len()
    }

    fn release_parked(&self, choice: Option<PathBuf>) {
        let sender = self
            .parked
            .lock()
            .expect("parked lock")
            .pop()
            .expect("a parked picker");
        sender(choice);
    }
}

impl ExportSurface for ScriptedSurface {
    fn present_export_picker(
        &self,
        _request: ExportPickerRequest,
        on_choice: ExportChoiceSender,
    ) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .expect("scripted picker call")
        {
            Scripted::Park => self.parked.lock().expect("parked lock").push(on_choice),
            Scripted::Cancel => on_choice(None),
            Scripted::Choose(path) => on_choice(Some(path)),
            Scripted::Fail => {
                return Err(AppError::new(
                    codes::NO_PRESENTATION_SURFACE,
                    "no window available to present the export picker",
                ));
            }
        }
        Ok(())
    }
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("clipdock-export-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write source file");
    path
}

fn payload_for(source: &Path) -> SaveFilePayload {
    SaveFilePayload {
        file_path: source.display().to_string(),
        file_name: source
            .file_name()
            .expect("file name")
            .to_string_lossy()
            .into_owned(),
    }
}

#[tokio::test]
async fn export_should_copy_source_to_chosen_destination() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "quarterly numbers");
    let destination = dir.join("exported.txt");
    let surface = ScriptedSurface::with_script(vec![Scripted::Choose(destination.clone())]);
    let service = ExportService::new(surface.clone());

    let outcome = service.export(payload_for(&source)).await.expect("export ok");

    match outcome {
        ExportOutcome::Saved(saved) => assert_eq!(saved, destination),
        other => panic!("expected saved outcome, got {other:?}"),
    }
    assert_eq!(
        std::fs::read_to_string(&destination).expect("read destination"),
        "quarterly numbers"
    );
    // Copy, not move.
    assert!(source.exists());
}

#[tokio::test]
async fn export_should_report_cancellation_distinctly() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "contents");
    let surface = ScriptedSurface::with_script(vec![Scripted::Cancel]);
    let service = ExportService::new(surface.clone());

    let outcome = service.export(payload_for(&source)).await.expect("cancel is not an error");
    assert!(matches!(outcome, ExportOutcome::Cancelled));
    assert_eq!(surface.calls(), 1);
}

#[tokio::test]
async fn export_should_reject_missing_source_before_presenting() {
    let dir = scratch_dir();
    let surface = ScriptedSurface::with_script(vec![]);
    let service = ExportService::new(surface.clone());

    let payload = SaveFilePayload {
        file_path: dir.join("absent.txt").display().to_string(),
        file_name: "absent.txt".to_string(),
    };
    let error = service.export(payload).await.expect_err("missing source");

    assert_eq!(error.code, codes::INVALID_ARGUMENTS);
    assert_eq!(surface.calls(), 0);
}

#[tokio::test]
async fn export_should_reject_blank_name_before_presenting() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "contents");
    let surface = ScriptedSurface::with_script(vec![]);
    let service = ExportService::new(surface.clone());

    let payload = SaveFilePayload {
        file_path: source.display().to_string(),
        file_name: "  ".to_string(),
    };
    let error = service.export(payload).await.expect_err("blank name");

    assert_eq!(error.code, codes::INVALID_ARGUMENTS);
    assert_eq!(surface.calls(), 0);
}

#[tokio::test]
async fn export_should_reject_second_call_while_pending() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "contents");
    let surface = ScriptedSurface::with_script(vec![Scripted::Park]);
    let service = Arc::new(ExportService::new(surface.clone()));

    let first = {
        let service = Arc::clone(&service);
        let payload = payload_for(&source);
        tokio::spawn(async move { service.export(payload).await })
    };

    for _ in 0..100 {
        if surface.parked_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(surface.parked_count(), 1, "first picker should be pending");

    let error = service
        .export(payload_for(&source))
        .await
        .expect_err("slot is busy");
    assert_eq!(error.code, codes::EXPORT_IN_PROGRESS);
    // The rejected call never reached the surface.
    assert_eq!(surface.calls(), 1);

    surface.release_parked(None);
    let outcome = first.await.expect("join first export").expect("first export");
    assert!(matches!(outcome, ExportOutcome::Cancelled));
}

#[tokio::test]
async fn slot_should_release_after_each_outcome() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "contents");
    let destination = dir.join("exported.txt");
    let surface = ScriptedSurface::with_script(vec![
        Scripted::Fail,
        Scripted::Cancel,
        Scripted::Choose(destination.clone()),
    ]);
    let service = ExportService::new(surface.clone());

    let error = service
        .export(payload_for(&source))
        .await
        .expect_err("surface failure");
    assert_eq!(error.code, codes::NO_PRESENTATION_SURFACE);

    let outcome = service.export(payload_for(&source)).await.expect("second export");
    assert!(matches!(outcome, ExportOutcome::Cancelled));

    let outcome = service.export(payload_for(&source)).await.expect("third export");
    assert!(matches!(outcome, ExportOutcome::Saved(_)));
    assert!(destination.exists());
}

#[tokio::test]
async fn export_onto_source_should_leave_file_intact() {
    let dir = scratch_dir();
    let source = write_source(&dir, "report.txt", "irreplaceable contents");
    let surface = ScriptedSurface::with_script(vec![Scripted::Choose(source.clone())]);
    let service = ExportService::new(surface);

    let outcome = service.export(payload_for(&source)).await.expect("export ok");

    assert!(matches!(outcome, ExportOutcome::Saved(_)));
    assert_eq!(
        std::fs::read_to_string(&source).expect("read source"),
        "irreplaceable contents"
    );
}
