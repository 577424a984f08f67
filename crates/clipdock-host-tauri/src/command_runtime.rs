use std::future::Future;
use std::time::Instant;

use clipdock_contracts::InvokeError;
use clipdock_kernel::RequestContext;

pub(crate) fn command_start(
    command: &str,
    request_id: &str,
    window_label: Option<&str>,
) -> Instant {
    tracing::info!(
        event = "command_start",
        command = command,
        request_id = request_id,
        window_label = window_label.unwrap_or("unknown")
    );

    Instant::now()
}

pub(crate) fn command_end_ok(command: &str, request_id: &str, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis() as u64;
    tracing::info!(
        event = "command_end",
        command = command,
        request_id = request_id,
        ok = true,
        duration_ms = duration_ms
    );
}

pub(crate) fn command_end_error<E>(command: &str, request_id: &str, started_at: Instant, error: &E)
where
    E: Clone + Into<InvokeError>,
{
    let error: InvokeError = error.clone().into().with_request_id(request_id.to_string());
    let duration_ms = started_at.elapsed().as_millis() as u64;
    let primary_cause = error.causes.first().cloned().unwrap_or_default();

    tracing::error!(
        event = "command_end",
        command = command,
        request_id = request_id,
        ok = false,
        duration_ms = duration_ms,
        error_code = error.code.as_str(),
        error_message = error.message.as_str(),
        error_primary_cause = primary_cause.as_str(),
        error_causes_count = error.causes.len()
    );
}

pub(crate) async fn run_command_async<T, E, Fut, F>(
    command: &str,
    request_id: Option<String>,
    window_label: Option<String>,
    op: F,
) -> Result<T, InvokeError>
where
    E: Clone + Into<InvokeError>,
    Fut: Future<Output = Result<T, E>>,
    F: FnOnce() -> Fut,
{
    let context = RequestContext::new(request_id, window_label);
    let started_at = command_start(command, context.request_id(), context.window_label());
    let result = op().await;
    match &result {
        Ok(_) => command_end_ok(command, context.request_id(), started_at),
        Err(error) => command_end_error(command, context.request_id(), started_at, error),
    }
    result.map_err(Into::into)
}
