use clipdock_capture::FrameExtractor;
use clipdock_contracts::{
    COMMAND_EXTRACT_FRAME, COMMAND_SAVE_FILE, CommandOutcome, CommandRequestDto,
    ExtractFramePayload, SaveFilePayload, not_implemented, parse_command_payload,
};
use clipdock_kernel::completion::CompletionHandle;
use clipdock_platform::{ExportOutcome, ExportService};
use serde_json::Value;

/// Routes one bridged command to its capability and resolves the completion
/// handle exactly once. The handle moves into the matched arm, so every path
/// out of a command consumes it.
pub struct CapabilityDispatcher {
    export: ExportService,
    extractor: FrameExtractor,
}

impl CapabilityDispatcher {
    pub fn new(export: ExportService, extractor: FrameExtractor) -> Self {
        Self { export, extractor }
    }

    pub async fn invoke(&self, request: CommandRequestDto, completion: CompletionHandle) {
        match request.kind.as_str() {
            COMMAND_SAVE_FILE => self.save_file(request.payload, completion).await,
            COMMAND_EXTRACT_FRAME => self.extract_frame(request.payload, completion).await,
            other => {
                tracing::debug!(event = "bridge_command_unknown", command = other);
                completion.error(not_implemented(other));
            }
        }
    }

    async fn save_file(&self, payload: Value, completion: CompletionHandle) {
        let payload = match parse_command_payload::<SaveFilePayload>(COMMAND_SAVE_FILE, payload) {
            Ok(payload) => payload,
            Err(error) => return completion.error(error),
        };

        match self.export.export(payload).await {
            Ok(ExportOutcome::Saved(destination)) => {
                completion.resolve(CommandOutcome::success_path(destination));
            }
            Ok(ExportOutcome::Cancelled) => completion.cancelled(),
            Err(error) => completion.error(error),
        }
    }

    async fn extract_frame(&self, payload: Value, completion: CompletionHandle) {
        let payload =
            match parse_command_payload::<ExtractFramePayload>(COMMAND_EXTRACT_FRAME, payload) {
                Ok(payload) => payload,
                Err(error) => return completion.error(error),
            };

        match self.extractor.extract(payload).await {
            Ok(frame_path) => completion.resolve(CommandOutcome::success_path(frame_path)),
            Err(error) => completion.error(error),
        }
    }
}

#[cfg(test)]
#[path = "../tests/dispatcher/dispatcher_tests.rs"]
mod tests;
