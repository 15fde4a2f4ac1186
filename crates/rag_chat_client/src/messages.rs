//! Wire types for the answer endpoint. The remote side expects German keys.

use serde::Serialize;

/// Request key holding the question text.
pub const QUESTION_KEY: &str = "frage";
/// Response key holding the answer text.
pub const ANSWER_KEY: &str = "antwort";
/// Gateway envelope field that may carry a JSON-encoded payload.
pub const BODY_KEY: &str = "body";

/// Client → endpoint: `{"frage": "<text>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub frage: &'a str,
}

impl<'a> QuestionRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self { frage: question }
    }
}
