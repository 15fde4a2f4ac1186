//! Commands for config load/save and the chat window.
//! The Tauri `#[command]` wrappers (feature `desktop`) delegate to these
//! testable plain functions.

use rag_chat_client::config::{self, Config, EndpointSection, UiSection};
use rag_chat_client::{AnswerClient, ChatSession, ChatView, ConversationId, Endpoint};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{info, warn};

// ── Global runtime for the blocking entry points ────────────────────────

fn global_runtime() -> &'static tokio::runtime::Runtime {
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to create tokio runtime")
    })
}

/// JSON-friendly config form values sent to/from the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigForm {
    pub endpoint_url: String,
    pub api_key: String,
    pub api_key_header: String,
    pub suggested_prompts: Vec<String>,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Config::default().into()
    }
}

impl From<Config> for ConfigForm {
    fn from(c: Config) -> Self {
        let suggested_prompts = c.suggested_prompts();
        Self {
            endpoint_url: c.endpoint.url.unwrap_or_default(),
            api_key: c.endpoint.api_key.unwrap_or_default(),
            api_key_header: c
                .endpoint
                .api_key_header
                .unwrap_or_else(|| config::DEFAULT_API_KEY_HEADER.into()),
            suggested_prompts,
        }
    }
}

impl From<ConfigForm> for Config {
    fn from(f: ConfigForm) -> Self {
        Config {
            endpoint: EndpointSection {
                url: Some(f.endpoint_url),
                api_key: Some(f.api_key),
                api_key_header: Some(f.api_key_header),
            },
            ui: UiSection {
                suggested_prompts: Some(f.suggested_prompts),
            },
        }
    }
}

/// Resolve config path from optional override, env, or default.
pub fn resolve_config_path(override_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(p) = override_path {
        return Ok(PathBuf::from(p));
    }
    if let Ok(val) = std::env::var("RAG_CHAT_CONFIG") {
        return Ok(PathBuf::from(val));
    }
    config::default_config_path().ok_or_else(|| "Cannot determine config path".into())
}

// ── Testable backend functions ──────────────────────────────────────────

/// Load config from `path` and return form values.
pub fn do_load_config(path: &str) -> Result<ConfigForm, String> {
    let cfg = config::load(std::path::Path::new(path)).map_err(|e| e.to_string())?;
    Ok(ConfigForm::from(cfg))
}

/// Save form values to `path` as YAML. Creates parent dirs if needed.
pub fn do_save_config(path: &str, form: &ConfigForm) -> Result<(), String> {
    let cfg: Config = form.clone().into();
    config::save(std::path::Path::new(path), &cfg).map_err(|e| e.to_string())
}

// ── Window state ────────────────────────────────────────────────────────

/// Everything the chat window owns. Managed by Tauri in the desktop build.
pub struct GuiState {
    session: Mutex<ChatSession>,
    client: Mutex<Option<AnswerClient>>,
    suggested_prompts: Mutex<Vec<String>>,
}

impl Default for GuiState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GuiState {
    /// Fresh session; the client is left unset when the config has no URL.
    pub fn from_config(cfg: &Config) -> Self {
        let client = match cfg.endpoint() {
            Ok(endpoint) => Some(AnswerClient::new(endpoint)),
            Err(e) => {
                warn!(error = %e, "no usable endpoint in config");
                None
            }
        };
        Self {
            session: Mutex::new(ChatSession::new()),
            client: Mutex::new(client),
            suggested_prompts: Mutex::new(cfg.suggested_prompts()),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, ChatSession>, String> {
        self.session.lock().map_err(|e| e.to_string())
    }

    fn client(&self) -> Result<Option<AnswerClient>, String> {
        Ok(self.client.lock().map_err(|e| e.to_string())?.clone())
    }
}

/// Apply form values to the running window (new endpoint, new prompts).
pub fn do_configure(state: &GuiState, form: &ConfigForm) -> Result<(), String> {
    let cfg: Config = form.clone().into();
    let endpoint: Endpoint = cfg.endpoint().map_err(|e| e.to_string())?;
    info!(url = %endpoint.url, "endpoint configured");
    *state.client.lock().map_err(|e| e.to_string())? = Some(AnswerClient::new(endpoint));
    *state.suggested_prompts.lock().map_err(|e| e.to_string())? = cfg.suggested_prompts();
    Ok(())
}

pub fn do_snapshot(state: &GuiState) -> Result<ChatView, String> {
    Ok(state.session()?.snapshot())
}

pub fn do_new_chat(state: &GuiState) -> Result<ChatView, String> {
    let mut session = state.session()?;
    session.new_chat();
    Ok(session.snapshot())
}

pub fn do_select_chat(state: &GuiState, id: ConversationId) -> Result<ChatView, String> {
    let mut session = state.session()?;
    session.select(id);
    Ok(session.snapshot())
}

pub fn do_dismiss_error(state: &GuiState) -> Result<ChatView, String> {
    let mut session = state.session()?;
    session.dismiss_error();
    Ok(session.snapshot())
}

pub fn do_suggested_prompts(state: &GuiState) -> Result<Vec<String>, String> {
    Ok(state
        .suggested_prompts
        .lock()
        .map_err(|e| e.to_string())?
        .clone())
}

/// Send `text` to the endpoint and record both sides in the session.
/// The session lock is released while the request is in flight, so
/// `do_snapshot` keeps working and reports `is_waiting`.
pub async fn do_send_message_async(state: &GuiState, text: &str) -> Result<ChatView, String> {
    let client = state.client()?.ok_or("No endpoint configured")?;

    let pending = {
        let mut session = state.session()?;
        match session.submit(text) {
            Some(p) => p,
            None => return Ok(session.snapshot()),
        }
    };

    let outcome = client.ask(&pending.question).await;

    let mut session = state.session()?;
    session.complete(pending, outcome);
    Ok(session.snapshot())
}

/// Blocking form of [`do_send_message_async`] on the global runtime.
pub fn do_send_message(state: &GuiState, text: &str) -> Result<ChatView, String> {
    global_runtime().block_on(do_send_message_async(state, text))
}

// ── Tauri command wrappers ──────────────────────────────────────────────

#[cfg(feature = "desktop")]
pub mod desktop {
    use super::*;
    use tauri::State;

    #[tauri::command]
    pub fn get_config_path() -> Result<String, String> {
        let p = resolve_config_path(None)?;
        p.to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "Config path is not valid UTF-8".into())
    }

    #[tauri::command]
    pub fn load_config(path: String) -> Result<ConfigForm, String> {
        do_load_config(&path)
    }

    #[tauri::command]
    pub fn save_config(
        state: State<'_, GuiState>,
        path: String,
        form: ConfigForm,
    ) -> Result<(), String> {
        do_save_config(&path, &form)?;
        do_configure(&state, &form)
    }

    #[tauri::command]
    pub fn chat_view(state: State<'_, GuiState>) -> Result<ChatView, String> {
        do_snapshot(&state)
    }

    #[tauri::command]
    pub fn new_chat(state: State<'_, GuiState>) -> Result<ChatView, String> {
        do_new_chat(&state)
    }

    #[tauri::command]
    pub fn select_chat(state: State<'_, GuiState>, id: ConversationId) -> Result<ChatView, String> {
        do_select_chat(&state, id)
    }

    #[tauri::command]
    pub fn dismiss_error(state: State<'_, GuiState>) -> Result<ChatView, String> {
        do_dismiss_error(&state)
    }

    #[tauri::command]
    pub fn suggested_prompts(state: State<'_, GuiState>) -> Result<Vec<String>, String> {
        do_suggested_prompts(&state)
    }

    #[tauri::command]
    pub async fn send_message(
        state: State<'_, GuiState>,
        text: String,
    ) -> Result<ChatView, String> {
        do_send_message_async(&state, &text).await
    }
}
