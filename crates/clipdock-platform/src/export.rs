use clipdock_contracts::{AppError, AppResult, ResultExt, SaveFilePayload, codes};
use clipdock_kernel::runtime::run_blocking;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct ExportPickerRequest {
    pub source: PathBuf,
    pub suggested_name: String,
}

pub type ExportChoiceSender = Box<dyn FnOnce(Option<PathBuf>) + Send + 'static>;

/// Seam to the OS save/export picker. The surface reports the user's choice
/// through `on_choice` exactly once: `Some(destination)` or `None` when the
/// picker is dismissed. Presentation failures are returned synchronously.
pub trait ExportSurface: Send + Sync {
    fn present_export_picker(
        &self,
        request: ExportPickerRequest,
        on_choice: ExportChoiceSender,
    ) -> AppResult<()>;
}

#[derive(Debug)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Cancelled,
}

/// Single export slot: at most one picker is pending at a time. A second
/// invocation while the slot is claimed is rejected, never queued and never
/// allowed to overwrite the pending completion.
#[derive(Default)]
struct ExportSlot {
    busy: Mutex<bool>,
}

struct SlotClaim {
    slot: Arc<ExportSlot>,
}

impl ExportSlot {
    fn try_claim(self: &Arc<Self>) -> AppResult<SlotClaim> {
        let mut busy = match self.busy.lock() {
            Ok(value) => value,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *busy {
            return Err(AppError::new(
                codes::EXPORT_IN_PROGRESS,
                "an export picker is already open",
            ));
        }
        *busy = true;
        Ok(SlotClaim {
            slot: Arc::clone(self),
        })
    }
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        let mut busy = match self.slot.busy.lock() {
            Ok(value) => value,
            Err(poisoned) => poisoned.into_inner(),
        };
        *busy = false;
    }
}

pub struct ExportService {
    surface: Arc<dyn ExportSurface>,
    slot: Arc<ExportSlot>,
}

impl ExportService {
    pub fn new(surface: Arc<dyn ExportSurface>) -> Self {
        Self {
            surface,
            slot: Arc::new(ExportSlot::default()),
        }
    }

    pub async fn export(&self, payload: SaveFilePayload) -> AppResult<ExportOutcome> {
        payload.validate()?;
        let source = PathBuf::from(payload.file_path.trim());
        ensure_readable_source(&source)?;

        let _claim = self.slot.try_claim()?;

        let (tx, rx) = oneshot::channel();
        let request = ExportPickerRequest {
            source: source.clone(),
            suggested_name: payload.file_name.trim().to_string(),
        };
        self.surface.present_export_picker(
            request,
            Box::new(move |choice| {
                let _ = tx.send(choice);
            }),
        )?;

        let choice = rx.await.map_err(|_| {
            AppError::new(
                codes::EXPORT_FAILED,
                "export picker closed without reporting a choice",
            )
        })?;

        match choice {
            None => {
                tracing::debug!(event = "export_cancelled", source = %source.display());
                Ok(ExportOutcome::Cancelled)
            }
            Some(destination) => {
                copy_to_destination(source, destination.clone()).await?;
                tracing::info!(event = "export_saved", destination = %destination.display());
                Ok(ExportOutcome::Saved(destination))
            }
        }
    }
}

fn ensure_readable_source(source: &Path) -> AppResult<()> {
    let metadata = std::fs::metadata(source)
        .with_code(codes::INVALID_ARGUMENTS, "source file is not readable")
        .with_ctx("filePath", source.display().to_string())?;
    if !metadata.is_file() {
        return Err(
            AppError::new(codes::INVALID_ARGUMENTS, "source path is not a file")
                .with_context("filePath", source.display().to_string()),
        );
    }
    std::fs::File::open(source)
        .with_code(codes::INVALID_ARGUMENTS, "source file is not readable")
        .with_ctx("filePath", source.display().to_string())?;
    Ok(())
}

async fn copy_to_destination(source: PathBuf, destination: PathBuf) -> AppResult<()> {
    run_blocking("export_copy", move || {
        // Copying a file onto itself truncates it before reading; the picker
        // can legally hand back the source path, so treat that as a no-op.
        if is_same_file(&source, &destination) {
            return Ok(());
        }

        std::fs::copy(&source, &destination)
            .with_code(codes::EXPORT_FAILED, "failed to copy exported file")
            .with_ctx("destination", destination.display().to_string())?;
        Ok(())
    })
    .await
}

fn is_same_file(source: &Path, destination: &Path) -> bool {
    if !destination.exists() {
        return false;
    }
    match (source.canonicalize(), destination.canonicalize()) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/export/export_tests.rs"]
mod tests;
