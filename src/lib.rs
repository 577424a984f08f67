#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    clipdock_host_tauri::shell(tauri::Builder::default())
        .run(tauri::generate_context!())
        .unwrap_or_else(|error| {
            eprintln!("error while running tauri application: {error}");
            panic!("error while running tauri application: {error}");
        });
}
