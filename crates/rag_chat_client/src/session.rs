//! Front-end state around the store: the waiting flag, the error banner, and
//! the submit → exchange → reply cycle. Shared by the GUI and the terminal.
//!
//! While a request is outstanding `submit` refuses new input. Nothing clears
//! `waiting` except `complete`, so a request that never resolves keeps the
//! input disabled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::{ConversationId, ConversationStore, Message, Sender};
use crate::exchange::{AnswerClient, ExchangeError};

/// A submitted question waiting for its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub conversation_id: ConversationId,
    pub question: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub store: ConversationStore,
    waiting: bool,
    error: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record the user's message and mark the session as waiting.
    /// Returns `None` for blank input, while waiting, or with no active thread.
    pub fn submit(&mut self, text: &str) -> Option<PendingExchange> {
        if text.trim().is_empty() || self.waiting {
            return None;
        }
        let conversation_id = self.store.active()?.id;
        let message = self.store.new_message(text, Sender::User);
        self.store.append_message(conversation_id, message);
        self.waiting = true;
        self.error = None;
        debug!(conversation_id, "question submitted");
        Some(PendingExchange {
            conversation_id,
            question: text.to_string(),
        })
    }

    /// Append the bot reply to the conversation that asked.
    pub fn complete(&mut self, pending: PendingExchange, outcome: Result<String, ExchangeError>) {
        let text = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                format!("Error: {}", message)
            }
        };
        let reply = self.store.new_message(text, Sender::Bot);
        self.store.append_message(pending.conversation_id, reply);
        self.waiting = false;
    }

    /// Submit, ask, complete. Returns the bot reply text, or `None` if the
    /// input was refused.
    pub async fn ask_and_record(&mut self, client: &AnswerClient, text: &str) -> Option<String> {
        let pending = self.submit(text)?;
        let outcome = client.ask(&pending.question).await;
        let conversation_id = pending.conversation_id;
        self.complete(pending, outcome);
        self.store
            .get(conversation_id)
            .and_then(|c| c.messages.last())
            .map(|m| m.text.clone())
    }

    pub fn new_chat(&mut self) -> ConversationId {
        self.error = None;
        self.store.create_conversation()
    }

    pub fn select(&mut self, id: ConversationId) {
        self.store.select_conversation(id);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn snapshot(&self) -> ChatView {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> ChatView {
        let active_id = self.store.active_id();
        let groups = self
            .store
            .group_by_recency_at(now)
            .into_iter()
            .map(|(bucket, members)| ConversationGroup {
                label: bucket.label().to_string(),
                conversations: members
                    .into_iter()
                    .map(|c| ConversationSummary {
                        id: c.id,
                        title: c.title.clone(),
                        active: c.id == active_id,
                    })
                    .collect(),
            })
            .collect();

        ChatView {
            groups,
            active_id,
            active_title: self.store.active().map(|c| c.title.clone()),
            messages: self.store.active_messages().to_vec(),
            is_waiting: self.waiting,
            error: self.error.clone(),
        }
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub active: bool,
}

/// One recency bucket in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationGroup {
    pub label: String,
    pub conversations: Vec<ConversationSummary>,
}

/// Everything a front end needs to render the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatView {
    pub groups: Vec<ConversationGroup>,
    pub active_id: ConversationId,
    pub active_title: Option<String>,
    pub messages: Vec<Message>,
    pub is_waiting: bool,
    pub error: Option<String>,
}
