// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    #[cfg(target_os = "linux")]
    sanitize_gtk_environment();

    rag_chat_gui_lib::run();
}

/// Drop `appmenu-gtk-module` from `GTK_MODULES`; it asserts on windows that
/// are not GDK Wayland windows. Also turn off the WebKit DMA-BUF renderer,
/// which draws a blank window on some drivers.
#[cfg(target_os = "linux")]
fn sanitize_gtk_environment() {
    use std::env;

    if let Ok(modules) = env::var("GTK_MODULES") {
        let filtered: Vec<&str> = modules
            .split(':')
            .filter(|m| !m.contains("appmenu-gtk-module"))
            .collect();
        if filtered.is_empty() {
            env::remove_var("GTK_MODULES");
        } else {
            env::set_var("GTK_MODULES", filtered.join(":"));
        }
    }

    if env::var_os("WEBKIT_DISABLE_DMABUF_RENDERER").is_none() {
        env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }
}
