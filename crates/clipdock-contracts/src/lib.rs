pub mod commands;
pub mod errors;

pub use commands::{
    COMMAND_EXTRACT_FRAME, COMMAND_SAVE_FILE, CommandOutcome, CommandRequestDto,
    ExtractFramePayload, SaveFilePayload, codes, invalid_arguments, not_implemented,
    parse_command_payload,
};
pub use errors::{
    AppError, AppErrorPayload, AppResult, ErrorContextItem, InvokeError, ResultExt,
};
