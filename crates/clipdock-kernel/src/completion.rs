use clipdock_contracts::{AppError, CommandOutcome, InvokeError};
use serde_json::Value;
use tokio::sync::oneshot;

/// Single-use completion for one bridged command. Resolving consumes the
/// handle, so a second resolution is unrepresentable; a handle dropped
/// without resolving surfaces on the waiting side as `completion_dropped`.
pub struct CompletionHandle {
    command: String,
    tx: oneshot::Sender<CommandOutcome>,
}

pub struct CompletionTicket {
    command: String,
    rx: oneshot::Receiver<CommandOutcome>,
}

pub fn completion_channel(command: impl Into<String>) -> (CompletionHandle, CompletionTicket) {
    let command = command.into();
    let (tx, rx) = oneshot::channel();
    (
        CompletionHandle {
            command: command.clone(),
            tx,
        },
        CompletionTicket { command, rx },
    )
}

impl CompletionHandle {
    pub fn command(&self) -> &str {
        self.command.as_str()
    }

    pub fn success(self, value: Value) {
        self.resolve(CommandOutcome::Success(value));
    }

    pub fn cancelled(self) {
        self.resolve(CommandOutcome::Cancelled);
    }

    pub fn error(self, error: impl Into<InvokeError>) {
        self.resolve(CommandOutcome::Error(error.into()));
    }

    pub fn resolve(self, outcome: CommandOutcome) {
        if self.tx.send(outcome).is_err() {
            tracing::warn!(
                event = "completion_receiver_gone",
                command = self.command.as_str()
            );
        }
    }
}

impl CompletionTicket {
    pub async fn wait(self) -> CommandOutcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(
                    event = "completion_dropped",
                    command = self.command.as_str()
                );
                CommandOutcome::Error(
                    AppError::new(
                        "completion_dropped",
                        "command finished without reporting an outcome",
                    )
                    .with_context("command", self.command)
                    .into(),
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/core/completion_tests.rs"]
mod tests;
