//! Answer extraction from the endpoint's response payload.
//!
//! Gateways in front of the answer service sometimes wrap the real payload in a
//! `body` field holding a JSON-encoded string. [`Envelope::from_payload`] peels that
//! layer once, then [`EXTRACTORS`] are tried in order until one yields text.

use serde_json::{json, Value};

use crate::messages::{ANSWER_KEY, BODY_KEY};

/// Outer payload plus the (possibly re-parsed) inner object.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub outer: Value,
    pub inner: Value,
}

impl Envelope {
    pub fn from_payload(outer: Value) -> Self {
        let inner = match outer.get(BODY_KEY).and_then(Value::as_str) {
            Some(body) => {
                serde_json::from_str(body).unwrap_or_else(|_| json!({ ANSWER_KEY: body }))
            }
            None => outer.clone(),
        };
        Self { outer, inner }
    }
}

/// One step of the fallback chain.
pub type Extractor = fn(&Envelope) -> Option<String>;

/// Tried in order; the first `Some` wins.
pub const EXTRACTORS: [Extractor; 5] = [
    inner_answer,
    outer_answer,
    inner_response,
    inner_message,
    whole_payload,
];

fn inner_answer(env: &Envelope) -> Option<String> {
    env.inner.get(ANSWER_KEY).and_then(usable_text)
}

fn outer_answer(env: &Envelope) -> Option<String> {
    env.outer.get(ANSWER_KEY).and_then(usable_text)
}

fn inner_response(env: &Envelope) -> Option<String> {
    env.inner.get("response").and_then(usable_text)
}

fn inner_message(env: &Envelope) -> Option<String> {
    env.inner.get("message").and_then(usable_text)
}

fn whole_payload(env: &Envelope) -> Option<String> {
    match &env.outer {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Text for a field value, or `None` for `null`, `false`, `0` and `""`.
/// Non-string values are rendered as JSON text.
pub fn usable_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Parse a response body as JSON.
pub fn parse_payload(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

/// Run the extractor chain over a parsed payload.
pub fn extract_answer(payload: &Value) -> String {
    let envelope = Envelope::from_payload(payload.clone());
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(&envelope))
        .unwrap_or_default()
}
