pub mod completion;
pub mod context;
pub mod runtime;

pub use clipdock_contracts::{
    AppError, AppErrorPayload, AppResult, ErrorContextItem, InvokeError, ResultExt,
};
pub use completion::{CompletionHandle, CompletionTicket, completion_channel};
pub use context::RequestContext;
