mod invoke;
mod setup;

pub(crate) use invoke::with_invoke_handler;
pub(crate) use setup::setup;
