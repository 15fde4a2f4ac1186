//! In-memory conversation store: threads, append-only messages, recency buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ConversationId = i64;
pub type MessageId = i64;

/// Title of the conversation present at startup.
pub const SEEDED_TITLE: &str = "Current Chat";
/// Title of a conversation created with new-chat.
pub const NEW_CHAT_TITLE: &str = "New Chat";
/// Characters of the first message kept in the rewritten title.
pub const TITLE_PREFIX_CHARS: usize = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub last_message_time: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: ConversationId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            last_message_time: now,
            messages: Vec::new(),
        }
    }

    /// Append and bump `last_message_time`. The first message renames the thread.
    pub fn push(&mut self, message: Message) {
        if self.messages.is_empty() {
            self.title = title_from_first_message(&message.text);
        }
        self.last_message_time = message.timestamp;
        self.messages.push(message);
    }
}

/// First 30 characters of `text` followed by `...`.
pub fn title_from_first_message(text: &str) -> String {
    let prefix: String = text.chars().take(TITLE_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}

/// Sidebar grouping derived from whole days since the last message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecencyBucket {
    Today,
    Yesterday,
    LastSevenDays,
    Older,
}

impl RecencyBucket {
    pub fn label(&self) -> &'static str {
        match self {
            RecencyBucket::Today => "Today",
            RecencyBucket::Yesterday => "Yesterday",
            RecencyBucket::LastSevenDays => "Last 7 days",
            RecencyBucket::Older => "Older",
        }
    }

    /// Whole days are floored; timestamps ahead of `now` count as today.
    pub fn for_elapsed(last: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - last).num_milliseconds().div_euclid(MILLIS_PER_DAY);
        match days {
            d if d <= 0 => RecencyBucket::Today,
            1 => RecencyBucket::Yesterday,
            d if d < 7 => RecencyBucket::LastSevenDays,
            _ => RecencyBucket::Older,
        }
    }
}

impl std::fmt::Display for RecencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A user action against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewChat,
    Append {
        conversation_id: ConversationId,
        message: Message,
    },
    Select(ConversationId),
}

/// All conversations plus the active selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: ConversationId,
    last_id: i64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// One seeded conversation (id 1), active.
    pub fn new() -> Self {
        Self {
            conversations: vec![Conversation::new(1, SEEDED_TITLE, Utc::now())],
            active_id: 1,
            last_id: 1,
        }
    }

    /// Millisecond clock, bumped so ids never repeat within the store.
    fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    pub fn create_conversation(&mut self) -> ConversationId {
        let id = self.next_id();
        self.conversations
            .push(Conversation::new(id, NEW_CHAT_TITLE, Utc::now()));
        self.active_id = id;
        id
    }

    /// Build a message stamped now with a fresh id.
    pub fn new_message(&mut self, text: impl Into<String>, sender: Sender) -> Message {
        Message {
            id: self.next_id(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Returns `false` when `conversation_id` is stale.
    pub fn append_message(&mut self, conversation_id: ConversationId, message: Message) -> bool {
        match self.get_mut(conversation_id) {
            Some(conversation) => {
                conversation.push(message);
                true
            }
            None => false,
        }
    }

    pub fn select_conversation(&mut self, id: ConversationId) {
        self.active_id = id;
    }

    /// Apply `command` to a copy and return it; `self` is left as it was.
    pub fn dispatch(&self, command: Command) -> ConversationStore {
        let mut next = self.clone();
        match command {
            Command::NewChat => {
                next.create_conversation();
            }
            Command::Append {
                conversation_id,
                message,
            } => {
                next.last_id = next.last_id.max(message.id);
                next.append_message(conversation_id, message);
            }
            Command::Select(id) => next.select_conversation(id),
        }
        next
    }

    pub fn active_id(&self) -> ConversationId {
        self.active_id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.get(self.active_id)
    }

    /// Messages of the active conversation, empty when nothing is active.
    pub fn active_messages(&self) -> &[Message] {
        self.active().map(|c| c.messages.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn group_by_recency(&self) -> Vec<(RecencyBucket, Vec<&Conversation>)> {
        self.group_by_recency_at(Utc::now())
    }

    /// Buckets in first-seen order; conversations keep insertion order.
    pub fn group_by_recency_at(
        &self,
        now: DateTime<Utc>,
    ) -> Vec<(RecencyBucket, Vec<&Conversation>)> {
        let mut groups: Vec<(RecencyBucket, Vec<&Conversation>)> = Vec::new();
        for conversation in &self.conversations {
            let bucket = RecencyBucket::for_elapsed(conversation.last_message_time, now);
            match groups.iter_mut().find(|(b, _)| *b == bucket) {
                Some((_, members)) => members.push(conversation),
                None => groups.push((bucket, vec![conversation])),
            }
        }
        groups
    }

    /// Add a conversation built elsewhere, keeping its timestamps.
    pub fn insert(&mut self, conversation: Conversation) {
        self.last_id = self.last_id.max(conversation.id);
        self.conversations.push(conversation);
    }
}
