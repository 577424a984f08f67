pub(crate) fn with_invoke_handler(
    builder: tauri::Builder<tauri::Wry>,
) -> tauri::Builder<tauri::Wry> {
    builder.invoke_handler(tauri::generate_handler![
        crate::features::bridge::commands::capability_invoke,
    ])
}
