use clipdock_contracts::{AppError, AppResult, codes};
use clipdock_platform::{ExportChoiceSender, ExportPickerRequest, ExportSurface};
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::DialogExt;

const MAIN_WINDOW_LABEL: &str = "main";

/// Export surface backed by the OS save dialog. The picker is parented to
/// the main window; a missing window means there is nothing to present on.
pub struct DialogExportSurface {
    app: AppHandle,
}

impl DialogExportSurface {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ExportSurface for DialogExportSurface {
    fn present_export_picker(
        &self,
        request: ExportPickerRequest,
        on_choice: ExportChoiceSender,
    ) -> AppResult<()> {
        let Some(window) = self.app.get_webview_window(MAIN_WINDOW_LABEL) else {
            return Err(AppError::new(
                codes::NO_PRESENTATION_SURFACE,
                "no window available to present the export picker",
            ));
        };

        tracing::debug!(
            event = "export_picker_presented",
            suggested_name = request.suggested_name.as_str()
        );

        self.app
            .dialog()
            .file()
            .set_parent(&window)
            .set_file_name(&request.suggested_name)
            .save_file(move |choice| {
                on_choice(choice.and_then(|path| path.into_path().ok()));
            });

        Ok(())
    }
}
