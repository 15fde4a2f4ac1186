//! Tauri application library: chat window commands over the shared client.

pub mod commands;

#[cfg(feature = "desktop")]
pub fn run() {
    use rag_chat_client::config;

    rag_chat_client::logging::init_tracing("info,rag_chat_client=debug");

    let cfg = commands::resolve_config_path(None)
        .ok()
        .and_then(|path| match config::load(&path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "starting without config");
                None
            }
        })
        .unwrap_or_default();

    tauri::Builder::default()
        .manage(commands::GuiState::from_config(&cfg))
        .invoke_handler(tauri::generate_handler![
            commands::desktop::get_config_path,
            commands::desktop::load_config,
            commands::desktop::save_config,
            commands::desktop::chat_view,
            commands::desktop::new_chat,
            commands::desktop::select_chat,
            commands::desktop::dismiss_error,
            commands::desktop::suggested_prompts,
            commands::desktop::send_message,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
