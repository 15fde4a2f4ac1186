//! Shared chat client library (config, conversation store, answer exchange).
//! Used by the Tauri GUI and the `rag-chat` terminal front end.

pub mod answer;
pub mod config;
pub mod conversation;
pub mod exchange;
pub mod logging;
pub mod messages;
pub mod session;

pub use config::{default_config_path, Config, ConfigError, Endpoint, EndpointSection, UiSection};
pub use conversation::{
    Command, Conversation, ConversationId, ConversationStore, Message, MessageId, RecencyBucket,
    Sender,
};
pub use exchange::{AnswerClient, ExchangeError};
pub use session::{ChatSession, ChatView, PendingExchange};
