use crate::errors::{AppError, AppResult, InvokeError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const COMMAND_SAVE_FILE: &str = "saveFile";
pub const COMMAND_EXTRACT_FRAME: &str = "extractFrame";

/// Error codes crossing the bridge to the managed layer. Internal failures
/// keep snake_case codes; these spell the channel contract.
pub mod codes {
    pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    pub const NO_PRESENTATION_SURFACE: &str = "NO_PRESENTATION_SURFACE";
    pub const EXPORT_IN_PROGRESS: &str = "EXPORT_IN_PROGRESS";
    pub const EXPORT_FAILED: &str = "EXPORT_FAILED";
    pub const FRAME_EXTRACTION_FAILED: &str = "FRAME_EXTRACTION_FAILED";
    pub const NO_IMAGE: &str = "NO_IMAGE";
    pub const IMAGE_CONVERSION_FAILED: &str = "IMAGE_CONVERSION_FAILED";
    pub const FILE_WRITE_FAILED: &str = "FILE_WRITE_FAILED";
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandRequestDto {
    pub kind: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFilePayload {
    pub file_path: String,
    pub file_name: String,
}

impl SaveFilePayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.file_path.trim().is_empty() {
            return Err(invalid_arguments(COMMAND_SAVE_FILE).with_context("field", "filePath"));
        }
        if self.file_name.trim().is_empty() {
            return Err(invalid_arguments(COMMAND_SAVE_FILE).with_context("field", "fileName"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractFramePayload {
    pub video_path: String,
    pub position_in_seconds: f64,
}

impl ExtractFramePayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.video_path.trim().is_empty() {
            return Err(invalid_arguments(COMMAND_EXTRACT_FRAME).with_context("field", "videoPath"));
        }
        if !self.position_in_seconds.is_finite() || self.position_in_seconds < 0.0 {
            return Err(invalid_arguments(COMMAND_EXTRACT_FRAME)
                .with_context("field", "positionInSeconds")
                .with_context("value", self.position_in_seconds.to_string()));
        }
        Ok(())
    }
}

/// One-step decode of a command payload; every shape violation collapses to a
/// single invalid-arguments error before any capability runs.
pub fn parse_command_payload<T>(kind: &str, payload: Value) -> AppResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value::<T>(payload).map_err(|error| {
        invalid_arguments(kind).with_source(error)
    })
}

pub fn invalid_arguments(kind: &str) -> AppError {
    AppError::new(codes::INVALID_ARGUMENTS, "invalid arguments").with_context("command", kind)
}

pub fn not_implemented(kind: &str) -> AppError {
    AppError::new(codes::NOT_IMPLEMENTED, "command not implemented on this host")
        .with_context("command", kind)
}

/// The single outcome a bridged call delivers through its completion handle.
/// Cancellation is a valid terminal outcome, not a failure.
#[derive(Debug)]
pub enum CommandOutcome {
    Success(Value),
    Cancelled,
    Error(InvokeError),
}

impl CommandOutcome {
    pub fn success_path(path: impl AsRef<std::path::Path>) -> Self {
        Self::Success(Value::String(path.as_ref().to_string_lossy().into_owned()))
    }

    /// Shape delivered to the managed layer: cancellation rides the success
    /// channel as null, preserving the wire contract.
    pub fn into_reply(self) -> Result<Value, InvokeError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Cancelled => Ok(Value::Null),
            Self::Error(error) => Err(error),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error(error) => Some(error.code.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/contracts/commands_tests.rs"]
mod tests;
