pub mod app;
mod bootstrap;
mod command_runtime;
pub mod features;
pub mod platform;

/// Attaches the Clipdock plugins, setup and command handlers to a builder.
/// The root app package owns `generate_context!` and the final `run`.
pub fn shell(builder: tauri::Builder<tauri::Wry>) -> tauri::Builder<tauri::Wry> {
    let builder = builder
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| bootstrap::setup(app));
    bootstrap::with_invoke_handler(builder)
}
