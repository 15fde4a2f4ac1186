//! Integration tests for the chat window backend.
//! Sends messages through the command functions to a real HTTP endpoint
//! running on its own thread.

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use rag_chat_client::Config;
use rag_chat_gui_lib::commands::{
    do_configure, do_dismiss_error, do_new_chat, do_select_chat, do_send_message, do_snapshot,
    do_suggested_prompts, ConfigForm, GuiState,
};
use std::sync::Arc;
use std::time::Duration;

/// Serve `body` with `status` after `delay`. Returns the endpoint URL.
fn spawn_endpoint(status: u16, body: &'static str, delay: Duration) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let status = StatusCode::from_u16(status).unwrap();
            let app = Router::new().route(
                "/ask",
                post(move || async move {
                    tokio::time::sleep(delay).await;
                    (status, body)
                }),
            );
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://127.0.0.1:{}/ask", port)
}

fn state_for(url: &str) -> GuiState {
    let mut cfg = Config::default();
    cfg.endpoint.url = Some(url.to_string());
    GuiState::from_config(&cfg)
}

#[test]
fn send_message_records_question_and_answer() {
    let url = spawn_endpoint(200, r#"{"antwort": "Hello world!"}"#, Duration::ZERO);
    let state = state_for(&url);

    let view = do_send_message(&state, "What is this?").expect("send should succeed");

    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[0].text, "What is this?");
    assert_eq!(view.messages[1].text, "Hello world!");
    assert_eq!(view.active_title.as_deref(), Some("What is this?..."));
    assert!(!view.is_waiting);
    assert!(view.error.is_none());
}

#[test]
fn server_error_shows_banner_and_error_message() {
    let url = spawn_endpoint(500, "internal", Duration::ZERO);
    let state = state_for(&url);

    let view = do_send_message(&state, "test").expect("send should not fail");

    let error = view.error.expect("banner should be set");
    assert!(error.contains("500"), "got: {}", error);
    let last = view.messages.last().unwrap();
    assert!(last.text.starts_with("Error: "));

    let view = do_dismiss_error(&state).unwrap();
    assert!(view.error.is_none());
    assert_eq!(view.messages.len(), 2);
}

#[test]
fn send_without_endpoint_returns_error() {
    let state = GuiState::default();
    let result = do_send_message(&state, "test");
    assert!(result.is_err(), "should error when no endpoint is configured");
    assert!(do_snapshot(&state).unwrap().messages.is_empty());
}

#[test]
fn view_reports_waiting_while_request_in_flight() {
    let url = spawn_endpoint(200, r#"{"antwort": "late"}"#, Duration::from_millis(500));
    let state = Arc::new(state_for(&url));

    let sender = {
        let state = state.clone();
        std::thread::spawn(move || do_send_message(&state, "slow question").unwrap())
    };
    std::thread::sleep(Duration::from_millis(200));

    let during = do_snapshot(&state).unwrap();
    assert!(during.is_waiting);
    assert_eq!(during.messages.len(), 1);

    // A second submit while waiting is refused.
    let refused = do_send_message(&state, "impatient").unwrap();
    assert_eq!(refused.messages.len(), 1);

    let after = sender.join().unwrap();
    assert!(!after.is_waiting);
    assert_eq!(after.messages.len(), 2);
    assert_eq!(after.messages[1].text, "late");
}

#[test]
fn new_chat_and_select_switch_threads() {
    let url = spawn_endpoint(200, r#"{"antwort": "ok"}"#, Duration::ZERO);
    let state = state_for(&url);

    do_send_message(&state, "first thread").unwrap();
    let first_id = do_snapshot(&state).unwrap().active_id;

    let view = do_new_chat(&state).unwrap();
    assert_ne!(view.active_id, first_id);
    assert!(view.messages.is_empty());
    assert_eq!(view.active_title.as_deref(), Some("New Chat"));
    let titles: Vec<String> = view.groups[0]
        .conversations
        .iter()
        .map(|c| c.title.clone())
        .collect();
    assert_eq!(titles, vec!["first thread...", "New Chat"]);

    let view = do_select_chat(&state, first_id).unwrap();
    assert_eq!(view.messages.len(), 2);

    let view = do_select_chat(&state, 1_234).unwrap();
    assert!(view.messages.is_empty());
    assert!(view.active_title.is_none());
}

#[test]
fn configure_switches_endpoint_and_prompts() {
    let url = spawn_endpoint(200, r#"{"response": "from new endpoint"}"#, Duration::ZERO);
    let state = GuiState::default();

    let form = ConfigForm {
        endpoint_url: url,
        api_key: String::new(),
        api_key_header: "x-api-key".into(),
        suggested_prompts: vec!["Only prompt".into()],
    };
    do_configure(&state, &form).unwrap();

    assert_eq!(do_suggested_prompts(&state).unwrap(), vec!["Only prompt"]);
    let view = do_send_message(&state, "hi").unwrap();
    assert_eq!(view.messages[1].text, "from new endpoint");
}

#[test]
fn configure_without_url_is_rejected() {
    let state = GuiState::default();
    let form = ConfigForm::default();
    assert!(do_configure(&state, &form).is_err());
}
