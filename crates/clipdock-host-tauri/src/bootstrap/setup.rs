use crate::app::state::AppState;
use crate::platform::dialog_surface::DialogExportSurface;
use clipdock_app::CapabilityDispatcher;
use clipdock_capture::{FfmpegFrameDecoder, FrameExtractor};
use clipdock_platform::ExportService;
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use tauri::Manager;

fn log_setup_stage(stage: &str, started_at: Instant, ok: bool) {
    tracing::info!(
        event = "setup_stage_done",
        stage = stage,
        duration_ms = started_at.elapsed().as_millis() as u64,
        ok = ok
    );
}

/// Builds the bridge exactly once, with its collaborators injected here and
/// nowhere else: the dialog surface, the ffmpeg decoder and the temp-dir
/// provider all arrive through construction.
pub(crate) fn setup(app: &mut tauri::App) -> Result<(), Box<dyn Error>> {
    let setup_started_at = Instant::now();

    let app_data_dir = app.path().app_data_dir()?;
    std::fs::create_dir_all(&app_data_dir)?;
    let logging_guard = clipdock_logging::init_logging(&app_data_dir)?;
    tracing::info!(
        event = "logging_initialized",
        level = logging_guard.level(),
        log_dir = %logging_guard.log_dir().to_string_lossy()
    );

    let dispatcher_stage_started_at = Instant::now();
    let surface = Arc::new(DialogExportSurface::new(app.handle().clone()));
    let decoder = Arc::new(FfmpegFrameDecoder::from_env());
    let dispatcher = CapabilityDispatcher::new(
        ExportService::new(surface),
        FrameExtractor::new(decoder, std::env::temp_dir()),
    );
    app.manage(AppState {
        dispatcher: Arc::new(dispatcher),
        started_at: Instant::now(),
    });
    log_setup_stage("dispatcher_init", dispatcher_stage_started_at, true);

    log_setup_stage("setup_total", setup_started_at, true);
    Ok(())
}
