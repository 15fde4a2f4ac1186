//! In-process HTTP endpoint standing in for the answer service.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use std::sync::{Arc, Mutex};

/// One request as the endpoint saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn answer(State(reply): State<Reply>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    reply.seen.lock().unwrap().push(Captured { headers, body });
    (reply.status, reply.body.clone())
}

fn router(status: u16, body: &str, seen: Arc<Mutex<Vec<Captured>>>) -> Router {
    let reply = Reply {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        seen,
    };
    Router::new().route("/ask", post(answer)).with_state(reply)
}

/// Serve `body` with `status` on a free port from the current runtime.
/// Returns the endpoint URL and the requests received so far.
pub async fn spawn_endpoint(status: u16, body: &str) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = router(status, body, seen.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}/ask", port), seen)
}

/// Same as [`spawn_endpoint`] but on its own thread, for blocking tests.
pub fn spawn_endpoint_thread(status: u16, body: &str) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let port = std_listener.local_addr().unwrap().port();
    let app = router(status, body, Arc::new(Mutex::new(Vec::new())));
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://127.0.0.1:{}/ask", port)
}

/// A URL nothing is listening on.
pub fn dead_endpoint() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = l.local_addr().unwrap().port();
    drop(l);
    format!("http://127.0.0.1:{}/ask", port)
}
