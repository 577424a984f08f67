use crate::app::state::AppState;
use crate::command_runtime::run_command_async;
use clipdock_contracts::{CommandRequestDto, InvokeError};
use clipdock_kernel::completion::completion_channel;
use serde_json::Value;
use tauri::State;

const BRIDGE_COMMAND: &str = "capability_invoke";

/// Entry point for every bridged capability call from the managed layer. The
/// reply shape is the channel contract: a value on success, null on user
/// cancellation, a structured error otherwise.
#[tauri::command]
pub async fn capability_invoke(
    state: State<'_, AppState>,
    request: CommandRequestDto,
    request_id: Option<String>,
    window_label: Option<String>,
) -> Result<Value, InvokeError> {
    run_command_async(
        BRIDGE_COMMAND,
        request_id,
        window_label,
        move || async move {
            let (completion, ticket) = completion_channel(request.kind.clone());
            state.dispatcher.invoke(request, completion).await;
            ticket.wait().await.into_reply()
        },
    )
    .await
}
