//! Answer exchange: one POST to the configured endpoint, one answer back.

use tracing::{debug, info, warn};

use crate::answer;
use crate::config::Endpoint;
use crate::messages::QuestionRequest;

/// Failure of a single exchange. Front ends only show the message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    #[error("{0}")]
    Transport(String),
    #[error("API error: {code} {reason}")]
    Status {
        code: u16,
        reason: String,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(e: reqwest::Error) -> Self {
        ExchangeError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(e: serde_json::Error) -> Self {
        ExchangeError::Parse(e.to_string())
    }
}

/// HTTP client bound to one endpoint. No timeout or retry is configured;
/// a hung request stays pending until the transport gives up.
#[derive(Debug, Clone)]
pub struct AnswerClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl AnswerClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Ask one question and return the extracted answer text.
    pub async fn ask(&self, question: &str) -> Result<String, ExchangeError> {
        let body = serde_json::to_string(&QuestionRequest::new(question))?;

        let mut request = self
            .http
            .post(&self.endpoint.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = self.endpoint.credential() {
            request = request.header(self.endpoint.api_key_header.as_str(), key);
        }

        debug!(url = %self.endpoint.url, chars = question.chars().count(), "sending question");
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed");
            ExchangeError::from(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "endpoint returned an error status");
            return Err(ExchangeError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let text = response.text().await?;
        let payload = answer::parse_payload(&text).map_err(|e| {
            warn!(error = %e, "response body is not JSON");
            ExchangeError::from(e)
        })?;
        let reply = answer::extract_answer(&payload);
        info!(chars = reply.chars().count(), "answer received");
        Ok(reply)
    }
}
